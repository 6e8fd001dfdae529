// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer requests and their local validation.

use alloy::primitives::{Address, U256};
use url::Url;

use super::TransferError;
use crate::blockchain::{
    check_positive_decimal, parse_address, parse_positive_amount, SigningKey, NATIVE_DECIMALS,
};

/// A transfer as submitted by the user.
///
/// `signing_key` is the raw key material; it is parsed once during
/// validation and never stored, logged or serialized.
#[derive(Clone)]
pub struct TransferRequest {
    pub recipient: String,
    /// Human-readable decimal amount
    pub amount: String,
    /// ERC-20 contract; the native asset when absent
    pub token_contract: Option<String>,
    pub endpoint: String,
    pub signing_key: String,
}

impl std::fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferRequest")
            .field("recipient", &self.recipient)
            .field("amount", &self.amount)
            .field("token_contract", &self.token_contract)
            .field("endpoint", &self.endpoint)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

/// What is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    /// Value already converted at the native 18 decimals.
    Native { value: U256 },
    /// The amount is converted once the contract's decimals are known.
    Token { contract: Address },
}

/// A request that passed every local check.
#[derive(Debug)]
pub struct ValidatedTransfer {
    pub recipient: Address,
    pub amount: String,
    pub asset: Asset,
    pub endpoint: Url,
    pub key: SigningKey,
}

impl TransferRequest {
    /// Check every field without touching the network.
    ///
    /// Consumes the request so the raw key string does not outlive parsing.
    pub fn validate(self) -> Result<ValidatedTransfer, TransferError> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(TransferError::validation("Recipient is required"));
        }
        let recipient = parse_address(recipient)
            .map_err(|e| TransferError::validation(format!("Recipient: {}", e)))?;

        let amount = self.amount.trim().to_string();
        let asset = match self.token_contract.as_deref().map(str::trim) {
            Some(contract) if !contract.is_empty() => {
                let contract = parse_address(contract)
                    .map_err(|e| TransferError::validation(format!("Token contract: {}", e)))?;
                check_positive_decimal(&amount)
                    .map_err(|e| TransferError::validation(format!("Amount: {}", e)))?;
                Asset::Token { contract }
            }
            _ => {
                let value = parse_positive_amount(&amount, NATIVE_DECIMALS)
                    .map_err(|e| TransferError::validation(format!("Amount: {}", e)))?;
                Asset::Native { value }
            }
        };

        let endpoint: Url = self
            .endpoint
            .trim()
            .parse()
            .map_err(|e| TransferError::validation(format!("Invalid endpoint: {}", e)))?;

        let key = SigningKey::parse(&self.signing_key)
            .map_err(|e| TransferError::validation(e.to_string()))?;

        Ok(ValidatedTransfer {
            recipient,
            amount,
            asset,
            endpoint,
            key,
        })
    }
}
