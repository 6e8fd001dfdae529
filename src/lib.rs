// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM Account Console - account snapshots and tracked transfers
//!
//! Gathers independent chain reads for one account into a consistent
//! snapshot and drives native / ERC-20 transfers through an observable
//! status lifecycle, exposed over a small HTTP API.
//!
//! ## Modules
//!
//! - `account` - Snapshot aggregation (balance, network, nonce, name, token)
//! - `transfer` - Transfer validation, submission and confirmation tracking
//! - `blockchain` - EVM JSON-RPC integration (alloy)
//! - `store` - In-memory presentation state
//! - `api` - HTTP API handlers (Axum)

pub mod account;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod transfer;

#[cfg(test)]
mod testing;
