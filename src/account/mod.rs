// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account snapshots.
//!
//! An [`AccountSnapshot`] merges several independent chain reads for one
//! address into a single immutable value. Balance, network and nonce are
//! mandatory; the reverse name lookup is best-effort.

pub mod aggregator;
pub mod network;
pub mod snapshot;

use serde::Serialize;
use utoipa::ToSchema;

pub use aggregator::{AccountSnapshotAggregator, SnapshotQuery};
pub use network::NetworkStatus;
pub use snapshot::{avatar_uri, AccountSnapshot, TokenSnapshot};

/// A mandatory snapshot field, named in [`AggregationError::PartialFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotField {
    Balance,
    Network,
    Nonce,
    TokenSymbol,
    TokenName,
    TokenDecimals,
    TokenBalance,
}

impl SnapshotField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Network => "network",
            Self::Nonce => "nonce",
            Self::TokenSymbol => "token_symbol",
            Self::TokenName => "token_name",
            Self::TokenDecimals => "token_decimals",
            Self::TokenBalance => "token_balance",
        }
    }
}

impl std::fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`AccountSnapshotAggregator::refresh`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AggregationError {
    /// Address, endpoint or token contract failed local validation.
    #[error("Invalid snapshot query: {0}")]
    InvalidInput(String),

    /// No client could be created for the endpoint.
    #[error("Network error at {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// One or more mandatory reads failed. The avatar is still derivable.
    #[error("Snapshot incomplete at {endpoint}, failed: {}", join_fields(.fields))]
    PartialFailure {
        endpoint: String,
        fields: Vec<SnapshotField>,
        avatar_uri: String,
        causes: Vec<String>,
    },
}

fn join_fields(fields: &[SnapshotField]) -> String {
    fields
        .iter()
        .map(SnapshotField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
