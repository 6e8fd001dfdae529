// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Decimals of the native asset (ether and every EVM chain's base coin).
pub const NATIVE_DECIMALS: u8 = 18;

/// Protocol-fixed gas cost of a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Priority fee used when the node does not answer `eth_maxPriorityFeePerGas`.
pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 1_500_000_000; // 1.5 gwei

/// A well-known chain, keyed by chain id.
#[derive(Debug, Clone, Copy)]
pub struct KnownChain {
    pub chain_id: u64,
    pub name: &'static str,
}

/// Chain ids the console can name. Anything else reports `"unknown"`.
pub const KNOWN_CHAINS: &[KnownChain] = &[
    KnownChain { chain_id: 1, name: "mainnet" },
    KnownChain { chain_id: 10, name: "optimism" },
    KnownChain { chain_id: 56, name: "bnb" },
    KnownChain { chain_id: 137, name: "matic" },
    KnownChain { chain_id: 8453, name: "base" },
    KnownChain { chain_id: 17000, name: "holesky" },
    KnownChain { chain_id: 42161, name: "arbitrum" },
    KnownChain { chain_id: 43113, name: "fuji" },
    KnownChain { chain_id: 43114, name: "avalanche" },
    KnownChain { chain_id: 11155111, name: "sepolia" },
];

/// Name of a chain id, `"unknown"` when not in [`KNOWN_CHAINS`].
pub fn chain_name(chain_id: u64) -> &'static str {
    KNOWN_CHAINS
        .iter()
        .find(|c| c.chain_id == chain_id)
        .map(|c| c.name)
        .unwrap_or("unknown")
}

/// Identity of the network behind an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NetworkInfo {
    /// Network name ("mainnet", "sepolia", ... or "unknown")
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
}

impl NetworkInfo {
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self {
            name: chain_name(chain_id).to_string(),
            chain_id,
        }
    }
}

/// Fee data as suggested by the node at the moment it was fetched.
///
/// Advisory only: valid for the endpoint it came from and re-fetched before
/// every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Legacy gas price (`eth_gasPrice`)
    pub gas_price: Option<u128>,
    /// EIP-1559 max fee per gas
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee per gas
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Gas price parameters placed on an outgoing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPricing {
    Legacy {
        gas_price: u128,
    },
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

impl GasPricing {
    /// Pick fee-market pricing when the node supplied it, legacy otherwise.
    pub fn from_fee_data(fees: &FeeEstimate) -> Option<Self> {
        match (fees.max_fee_per_gas, fees.max_priority_fee_per_gas, fees.gas_price) {
            (Some(max_fee_per_gas), Some(max_priority_fee_per_gas), _) => Some(Self::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            }),
            (_, _, Some(gas_price)) => Some(Self::Legacy { gas_price }),
            _ => None,
        }
    }

    /// Upper bound paid per unit of gas.
    pub fn max_price_per_gas(&self) -> u128 {
        match *self {
            Self::Legacy { gas_price } => gas_price,
            Self::Eip1559 { max_fee_per_gas, .. } => max_fee_per_gas,
        }
    }

    /// Worst-case fee for `gas_limit` units of gas.
    pub fn max_cost(&self, gas_limit: u64) -> U256 {
        U256::from(gas_limit) * U256::from(self.max_price_per_gas())
    }
}

/// A native value transfer ready to be signed.
#[derive(Debug, Clone)]
pub struct NativeTransfer {
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub pricing: GasPricing,
}

/// An ERC-20 `transfer(to, amount)` call ready to be signed.
#[derive(Debug, Clone)]
pub struct TokenTransfer {
    pub token: Address,
    pub to: Address,
    pub amount: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub pricing: GasPricing,
}

/// Transaction receipt after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction was successful
    pub success: bool,
}

/// A transaction as returned by `eth_getTransactionByHash`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionInfo {
    /// Transaction hash
    pub tx_hash: String,
    /// Sender address
    pub from: String,
    /// Recipient (None for contract creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Value in wei
    pub value_wei: String,
    /// Sender nonce
    pub nonce: u64,
    /// Gas limit
    pub gas_limit: u64,
    /// Block number, None while pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}
