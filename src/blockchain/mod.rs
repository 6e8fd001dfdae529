// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for EVM chains.
//!
//! This module provides functionality for:
//! - Querying native and ERC-20 balances, network identity and fee data
//! - ENS reverse resolution
//! - Transaction signing, broadcasting and confirmation tracking

pub mod address;
pub mod client;
pub mod ens;
pub mod erc20;
pub mod signing;
pub mod tools;
pub mod types;
pub mod units;

pub use address::{checksum, parse_address};
pub use client::{ChainClient, ChainClientError, ChainConnector, ConfirmationPolicy, EvmConnector};
pub use signing::SigningKey;
pub use types::*;
pub use units::{
    check_positive_decimal, format_amount, format_gwei, parse_amount, parse_positive_amount,
    AmountError,
};
