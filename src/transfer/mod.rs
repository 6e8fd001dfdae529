// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fund transfers with observable progress.
//!
//! A [`TransferOrchestrator`] runs one transfer at a time: it validates the
//! request, prices it from fresh fee data, submits it and tracks it to a
//! terminal [`TransferStatus`]. Every status is sent to the caller's
//! [`TransferStream`] and published to the view sink.

pub mod orchestrator;
pub mod request;
pub mod status;

use serde::Serialize;

use crate::blockchain::ChainClientError;

pub use orchestrator::{TransferOrchestrator, TransferStream};
pub use request::TransferRequest;
pub use status::TransferStatus;

/// Why a transfer did not reach `Confirmed`.
///
/// Amounts are decimal strings in the asset's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TransferError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("A transfer is already in progress")]
    AlreadyInProgress,

    #[error("Network error at {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("Transaction rejected: {0}")]
    SubmissionRejected(String),

    #[error("Transaction {tx_hash} reverted in block {block_number}")]
    ConfirmationFailed { tx_hash: String, block_number: u64 },
}

impl TransferError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Classify a chain error raised while talking to `endpoint`.
    pub fn from_chain(endpoint: &str, err: ChainClientError) -> Self {
        match err {
            ChainClientError::SubmissionRejected(msg) => Self::SubmissionRejected(msg),
            other => Self::Network {
                endpoint: endpoint.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::AlreadyInProgress => "already_in_progress",
            Self::Network { .. } => "network",
            Self::SubmissionRejected(_) => "submission_rejected",
            Self::ConfirmationFailed { .. } => "confirmation_failed",
        }
    }
}
