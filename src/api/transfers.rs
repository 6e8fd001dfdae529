// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer endpoints.
//!
//! `POST /v1/transfers` starts a transfer and returns immediately; progress
//! is read back from `GET /v1/transfers/status`.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    state::AppState,
    transfer::{TransferRequest, TransferStatus},
};

/// Body of a transfer request.
///
/// No `Debug` derive: the body carries the signing key.
#[derive(Deserialize, ToSchema)]
pub struct CreateTransferRequest {
    /// Recipient address
    pub recipient: String,
    /// Decimal amount in human units, e.g. "0.01"
    pub amount: String,
    /// ERC-20 contract; the native asset when absent
    pub token_contract: Option<String>,
    /// JSON-RPC endpoint. The configured default when absent.
    pub endpoint: Option<String>,
    /// Hex (optionally 0x-prefixed) or PEM secp256k1 private key
    pub signing_key: String,
}

/// Flattened view of a [`TransferStatus`].
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferStatusResponse {
    /// idle, validating, submitting, pending, confirmed or failed
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Failure kind, e.g. insufficient_funds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&TransferStatus> for TransferStatusResponse {
    fn from(status: &TransferStatus) -> Self {
        let (block_number, reason) = match status {
            TransferStatus::Confirmed { block_number, .. } => (Some(*block_number), None),
            TransferStatus::Failed { reason } => (None, Some(reason)),
            _ => (None, None),
        };
        Self {
            state: status.name().to_string(),
            tx_hash: status.tx_hash().map(str::to_string),
            block_number,
            error_kind: reason.map(|r| r.kind().to_string()),
            error: reason.map(ToString::to_string),
        }
    }
}

/// Start a transfer.
///
/// Returns 202 as soon as the transfer is accepted; it then runs in the
/// background. Only one transfer runs at a time.
#[utoipa::path(
    post,
    path = "/v1/transfers",
    tag = "Transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 202, description = "Transfer started", body = TransferStatusResponse),
        (status = 409, description = "Another transfer is in progress")
    )
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(body): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<TransferStatusResponse>), ApiError> {
    let request = TransferRequest {
        endpoint: state.endpoint_or_default(body.endpoint.as_deref()),
        recipient: body.recipient,
        amount: body.amount,
        token_contract: body.token_contract,
        signing_key: body.signing_key,
    };

    // Progress is published to the store; the stream itself is not needed.
    let _stream = state.orchestrator.submit(request)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(TransferStatusResponse::from(&TransferStatus::Idle)),
    ))
}

/// Latest status of the current or most recent transfer.
#[utoipa::path(
    get,
    path = "/v1/transfers/status",
    tag = "Transfers",
    responses(
        (status = 200, description = "Latest transfer status", body = TransferStatusResponse)
    )
)]
pub async fn get_transfer_status(State(state): State<AppState>) -> Json<TransferStatusResponse> {
    let status = state.store.transfer_status().await;
    Json(TransferStatusResponse::from(&status))
}
