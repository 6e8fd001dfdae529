// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::account::AggregationError;
use crate::blockchain::ChainClientError;
use crate::transfer::TransferError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Structured context, e.g. which snapshot fields failed.
    pub details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        let message = err.to_string();
        match err {
            AggregationError::InvalidInput(_) => Self::bad_request(message),
            AggregationError::Network { .. } => Self::service_unavailable(message),
            AggregationError::PartialFailure {
                endpoint,
                fields,
                avatar_uri,
                causes,
            } => Self::bad_gateway(message).with_details(json!({
                "endpoint": endpoint,
                "failed_fields": fields,
                "avatar_uri": avatar_uri,
                "causes": causes,
            })),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        let status = match &err {
            TransferError::Validation(_) => StatusCode::BAD_REQUEST,
            TransferError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TransferError::AlreadyInProgress => StatusCode::CONFLICT,
            TransferError::Network { .. } => StatusCode::SERVICE_UNAVAILABLE,
            TransferError::SubmissionRejected(_) | TransferError::ConfirmationFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, err.to_string()).with_details(json!({ "kind": err.kind() }))
    }
}

impl From<ChainClientError> for ApiError {
    fn from(err: ChainClientError) -> Self {
        match err {
            ChainClientError::InvalidRpcUrl(_)
            | ChainClientError::InvalidAddress(_)
            | ChainClientError::InvalidPrivateKey(_) => Self::bad_request(err.to_string()),
            ChainClientError::RpcError(_) | ChainClientError::ContractError(_) => {
                Self::service_unavailable(err.to_string())
            }
            ChainClientError::SubmissionRejected(_) => Self::bad_gateway(err.to_string()),
        }
    }
}
