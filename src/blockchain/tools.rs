// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Small offline utilities: hashing and throwaway wallets.

use alloy::{primitives::keccak256, signers::local::PrivateKeySigner};
use k256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey};
use serde::Serialize;
use utoipa::ToSchema;

use super::address::checksum;
use super::client::ChainClientError;

/// keccak256 of UTF-8 text as `0x`-prefixed hex.
pub fn keccak256_text(text: &str) -> String {
    alloy::hex::encode_prefixed(keccak256(text.as_bytes()))
}

/// A freshly generated key pair.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedWallet {
    /// Checksummed address
    pub address: String,
    /// 0x-prefixed private key
    pub private_key: String,
    /// 0x-prefixed uncompressed SEC1 public key
    pub public_key: String,
}

/// Generate a random wallet. Intended for test networks only.
pub fn generate_wallet() -> Result<GeneratedWallet, ChainClientError> {
    let signer = PrivateKeySigner::random();
    let key_bytes = signer.to_bytes();

    let secret = SecretKey::from_slice(key_bytes.as_slice())
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))?;
    let public_key = secret.public_key().to_encoded_point(false);

    Ok(GeneratedWallet {
        address: checksum(&signer.address()),
        private_key: alloy::hex::encode_prefixed(key_bytes),
        public_key: alloy::hex::encode_prefixed(public_key.as_bytes()),
    })
}
