// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::Serialize;

use super::TransferError;

/// Progress of a single transfer.
///
/// Moves forward only: `Idle`, `Validating`, `Submitting`, `Pending`, then
/// exactly one of `Confirmed` or `Failed`. Validation and pre-submission
/// failures skip straight to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TransferStatus {
    #[default]
    Idle,
    Validating,
    Submitting,
    Pending {
        tx_hash: String,
    },
    Confirmed {
        tx_hash: String,
        block_number: u64,
    },
    Failed {
        reason: TransferError,
    },
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Pending { .. } => "pending",
            Self::Confirmed { .. } => "confirmed",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Pending { tx_hash } | Self::Confirmed { tx_hash, .. } => Some(tx_hash),
            Self::Failed {
                reason: TransferError::ConfirmationFailed { tx_hash, .. },
            } => Some(tx_hash),
            _ => None,
        }
    }
}
