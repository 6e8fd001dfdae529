// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing credentials.
//!
//! A [`SigningKey`] is accepted as a hex private key (what wallets export)
//! or as a PKCS#8 / SEC1 PEM document. It lives only as long as the transfer
//! that uses it; the inner key material is zeroized by k256 on drop.

use std::fmt;

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use k256::SecretKey;

use super::client::ChainClientError;

/// Opaque transfer credential. Never serialized, never logged.
#[derive(Clone)]
pub struct SigningKey {
    signer: PrivateKeySigner,
}

impl SigningKey {
    /// Parse a hex (optionally `0x`-prefixed) or PEM-encoded secp256k1 key.
    pub fn parse(raw: &str) -> Result<Self, ChainClientError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ChainClientError::InvalidPrivateKey(
                "Signing key is required".to_string(),
            ));
        }

        let signer = if raw.starts_with("-----BEGIN") {
            signer_from_pem(raw.as_bytes())?
        } else {
            signer_from_hex(raw)?
        };
        Ok(Self { signer })
    }

    /// Address controlled by this key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet suitable for an alloy signing provider.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("address", &self.signer.address())
            .finish_non_exhaustive()
    }
}

/// Create a signer from a private key hex string.
fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainClientError> {
    let hex = private_key_hex
        .strip_prefix("0x")
        .unwrap_or(private_key_hex);
    if hex.len() != 64 {
        return Err(ChainClientError::InvalidPrivateKey(
            "Private key must be 32 bytes (64 hex characters)".to_string(),
        ));
    }

    let key_bytes = alloy::hex::decode(hex)
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
}

/// Create a signer from a PEM-encoded private key.
fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, ChainClientError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| {
            use k256::pkcs8::DecodePrivateKey;
            SecretKey::from_pkcs8_der(pem.contents())
        })
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid key format: {}", e)))?;

    PrivateKeySigner::from_slice(&secret_key.to_bytes())
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
}
