// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account snapshot types.

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::blockchain::checksum;

/// Identicon service used for account avatars.
pub const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/identicon/svg";

/// Avatar URI for an address. Pure: no network access, same input same URI.
pub fn avatar_uri(address: &Address) -> String {
    format!("{}?seed={}", AVATAR_BASE_URL, checksum(address))
}

/// Everything known about one account as of one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccountSnapshot {
    /// Checksummed account address
    pub address: String,
    /// Endpoint the snapshot was read from
    pub endpoint: String,
    /// Network name at snapshot time
    pub network_name: String,
    /// Chain ID at snapshot time
    pub chain_id: u64,
    /// Native balance in wei
    #[serde(serialize_with = "serialize_decimal")]
    #[schema(value_type = String)]
    pub balance_wei: U256,
    /// Native balance in ether
    pub balance: String,
    /// Next nonce, counting pending transactions
    pub nonce: u64,
    /// Reverse-resolved name, absent when none is set or lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Identicon URI derived from the address
    pub avatar_uri: String,
    /// Token position, present when a token contract was queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenSnapshot>,
    /// When the reads completed
    pub fetched_at: DateTime<Utc>,
}

/// ERC-20 position of an account.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TokenSnapshot {
    /// Checksummed token contract address
    pub contract: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    /// Balance in the token's smallest unit
    #[serde(serialize_with = "serialize_decimal")]
    #[schema(value_type = String)]
    pub balance_raw: U256,
    /// Balance formatted with `decimals`
    pub balance: String,
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
