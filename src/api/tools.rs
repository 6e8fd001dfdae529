// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Offline helper endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::tools::{generate_wallet, keccak256_text, GeneratedWallet},
    error::ApiError,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct HashRequest {
    /// UTF-8 text to hash
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HashResponse {
    /// 0x-prefixed keccak256 digest
    pub hash: String,
}

/// keccak256 of UTF-8 text.
#[utoipa::path(
    post,
    path = "/v1/tools/keccak256",
    tag = "Tools",
    request_body = HashRequest,
    responses(
        (status = 200, description = "Digest computed", body = HashResponse)
    )
)]
pub async fn keccak256(Json(body): Json<HashRequest>) -> Json<HashResponse> {
    Json(HashResponse {
        hash: keccak256_text(&body.text),
    })
}

/// Generate a random wallet. For test networks only: the private key is
/// returned in the response and not kept.
#[utoipa::path(
    post,
    path = "/v1/tools/wallets",
    tag = "Tools",
    responses(
        (status = 200, description = "Wallet generated", body = GeneratedWallet)
    )
)]
pub async fn create_wallet() -> Result<Json<GeneratedWallet>, ApiError> {
    let wallet = generate_wallet()?;
    tracing::info!(address = %wallet.address, "Generated throwaway wallet");
    Ok(Json(wallet))
}
