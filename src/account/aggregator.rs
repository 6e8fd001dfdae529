// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Concurrent gathering of account reads into one snapshot.

use std::sync::Arc;

use alloy::primitives::Address;
use chrono::Utc;
use url::Url;

use super::network::{read_network_status, NetworkStatus};
use super::snapshot::{avatar_uri, AccountSnapshot, TokenSnapshot};
use super::{AggregationError, SnapshotField};
use crate::blockchain::{
    checksum, format_amount, parse_address, ChainClient, ChainClientError, ChainConnector,
    NATIVE_DECIMALS,
};

/// What to snapshot: an account on an endpoint, optionally with a token.
#[derive(Debug, Clone)]
pub struct SnapshotQuery {
    pub address: String,
    pub endpoint: String,
    pub token_contract: Option<String>,
}

impl SnapshotQuery {
    pub fn native(address: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            endpoint: endpoint.into(),
            token_contract: None,
        }
    }

    pub fn with_token(mut self, token_contract: impl Into<String>) -> Self {
        self.token_contract = Some(token_contract.into());
        self
    }
}

/// Issues the read batch for a [`SnapshotQuery`] and merges the results.
///
/// Holds no state between calls: every refresh is a live read.
#[derive(Clone)]
pub struct AccountSnapshotAggregator {
    connector: Arc<dyn ChainConnector>,
}

impl AccountSnapshotAggregator {
    pub fn new(connector: Arc<dyn ChainConnector>) -> Self {
        Self { connector }
    }

    /// Read a fresh snapshot.
    ///
    /// The query is validated before any network access. All reads are
    /// issued together and the result is built only after every one of
    /// them settled.
    pub async fn refresh(&self, query: &SnapshotQuery) -> Result<AccountSnapshot, AggregationError> {
        let address = parse_address(&query.address)
            .map_err(|e| AggregationError::InvalidInput(e.to_string()))?;
        let endpoint = parse_endpoint(&query.endpoint)?;
        let token = query
            .token_contract
            .as_deref()
            .map(parse_address)
            .transpose()
            .map_err(|e| AggregationError::InvalidInput(format!("Token contract: {}", e)))?;

        let client = self.connect(&endpoint)?;
        collect(client.as_ref(), address, token).await
    }

    /// Read identity, chain head and fee data of an endpoint.
    pub async fn network_status(&self, endpoint: &str) -> Result<NetworkStatus, AggregationError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = self.connect(&endpoint)?;
        read_network_status(client.as_ref()).await
    }

    fn connect(&self, endpoint: &Url) -> Result<Arc<dyn ChainClient>, AggregationError> {
        self.connector
            .connect(endpoint)
            .map_err(|e| AggregationError::Network {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, AggregationError> {
    raw.parse()
        .map_err(|e: url::ParseError| AggregationError::InvalidInput(format!("Invalid endpoint: {}", e)))
}

/// Run the read batch against one client.
async fn collect(
    client: &dyn ChainClient,
    address: Address,
    token: Option<Address>,
) -> Result<AccountSnapshot, AggregationError> {
    let endpoint = client.endpoint().to_string();
    let avatar = avatar_uri(&address);

    let native_reads = async {
        tokio::join!(
            client.get_balance(address),
            client.get_network(),
            client.get_transaction_count(address),
            client.lookup_address(address),
        )
    };
    let token_reads = async {
        match token {
            Some(t) => Some(tokio::join!(
                client.token_symbol(t),
                client.token_name(t),
                client.token_decimals(t),
                client.token_balance_of(t, address),
            )),
            None => None,
        }
    };

    let ((balance, network, nonce, display_name), token_results) =
        tokio::join!(native_reads, token_reads);

    let mut failures = Failures::default();
    let balance_wei = failures.take(SnapshotField::Balance, balance);
    let network = failures.take(SnapshotField::Network, network);
    let nonce = failures.take(SnapshotField::Nonce, nonce);

    let token = match token_results {
        Some((symbol, name, decimals, balance_raw)) => {
            let symbol = failures.take(SnapshotField::TokenSymbol, symbol);
            let name = failures.take(SnapshotField::TokenName, name);
            let decimals = failures.take(SnapshotField::TokenDecimals, decimals);
            let balance_raw = failures.take(SnapshotField::TokenBalance, balance_raw);
            match (symbol, name, decimals, balance_raw) {
                (Some(symbol), Some(name), Some(decimals), Some(balance_raw)) => {
                    Some(TokenSnapshot {
                        contract: token.as_ref().map(checksum).unwrap_or_default(),
                        symbol,
                        name,
                        decimals,
                        balance_raw,
                        balance: format_amount(balance_raw, decimals),
                    })
                }
                _ => None,
            }
        }
        None => None,
    };

    let (Some(balance_wei), Some(network), Some(nonce), true) =
        (balance_wei, network, nonce, failures.is_empty())
    else {
        tracing::warn!(
            address = %address,
            endpoint = %endpoint,
            failed = ?failures.fields,
            "Account snapshot incomplete"
        );
        return Err(AggregationError::PartialFailure {
            endpoint,
            fields: failures.fields,
            avatar_uri: avatar,
            causes: failures.causes,
        });
    };

    let display_name = match display_name {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!(address = %address, error = %e, "Reverse lookup unavailable");
            None
        }
    };

    tracing::debug!(address = %address, endpoint = %endpoint, nonce, "Account snapshot ready");

    Ok(AccountSnapshot {
        address: checksum(&address),
        endpoint,
        network_name: network.name,
        chain_id: network.chain_id,
        balance_wei,
        balance: format_amount(balance_wei, NATIVE_DECIMALS),
        nonce,
        display_name,
        avatar_uri: avatar,
        token,
        fetched_at: Utc::now(),
    })
}

/// Mandatory reads that failed, in query order.
#[derive(Default)]
struct Failures {
    fields: Vec<SnapshotField>,
    causes: Vec<String>,
}

impl Failures {
    fn take<T>(&mut self, field: SnapshotField, result: Result<T, ChainClientError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.causes.push(format!("{field}: {e}"));
                self.fields.push(field);
                None
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
