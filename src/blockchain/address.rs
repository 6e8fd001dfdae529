// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address parsing and display.

use alloy::primitives::Address;

use super::client::ChainClientError;

/// Parse an Ethereum address.
///
/// Requires `0x` + 40 hex characters. All-lowercase and all-uppercase input
/// is accepted as is; mixed case must be a valid EIP-55 checksum.
pub fn parse_address(raw: &str) -> Result<Address, ChainClientError> {
    let raw = raw.trim();
    let Some(hex) = raw.strip_prefix("0x") else {
        return Err(ChainClientError::InvalidAddress(
            "Address must start with 0x".to_string(),
        ));
    };
    if hex.len() != 40 {
        return Err(ChainClientError::InvalidAddress(
            "Address must be 42 characters (0x + 40 hex)".to_string(),
        ));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainClientError::InvalidAddress(
            "Address must contain only hex characters".to_string(),
        ));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(raw, None)
            .map_err(|_| ChainClientError::InvalidAddress("Bad address checksum".to_string()))
    } else {
        raw.parse::<Address>()
            .map_err(|e| ChainClientError::InvalidAddress(e.to_string()))
    }
}

/// EIP-55 checksummed form.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}
