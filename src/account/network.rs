// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network overview: identity, chain head and current fees of an endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::AggregationError;
use crate::blockchain::{format_gwei, ChainClient, FeeEstimate};

/// Fee data and chain head for one endpoint at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NetworkStatus {
    pub endpoint: String,
    pub network_name: String,
    pub chain_id: u64,
    /// Latest block number
    pub block_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price_wei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price_gwei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas_wei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas_gwei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas_wei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas_gwei: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Read network identity, block number and fee data concurrently.
///
/// All three reads are required; the error names every one that failed.
pub(crate) async fn read_network_status(
    client: &dyn ChainClient,
) -> Result<NetworkStatus, AggregationError> {
    let endpoint = client.endpoint().to_string();

    let (network, block_number, fees) = tokio::join!(
        client.get_network(),
        client.get_block_number(),
        client.get_fee_data(),
    );

    let (network, block_number, fees) = match (network, block_number, fees) {
        (Ok(n), Ok(b), Ok(f)) => (n, b, f),
        (network, block_number, fees) => {
            let message = [
                network.err().map(|e| format!("network: {e}")),
                block_number.err().map(|e| format!("block_number: {e}")),
                fees.err().map(|e| format!("fee_data: {e}")),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("; ");
            tracing::warn!(endpoint = %endpoint, error = %message, "Network status incomplete");
            return Err(AggregationError::Network { endpoint, message });
        }
    };

    let FeeEstimate {
        gas_price,
        max_fee_per_gas,
        max_priority_fee_per_gas,
    } = fees;

    Ok(NetworkStatus {
        endpoint,
        network_name: network.name,
        chain_id: network.chain_id,
        block_number,
        gas_price_wei: gas_price.map(|v| v.to_string()),
        gas_price_gwei: gas_price.map(format_gwei),
        max_fee_per_gas_wei: max_fee_per_gas.map(|v| v.to_string()),
        max_fee_per_gas_gwei: max_fee_per_gas.map(format_gwei),
        max_priority_fee_per_gas_wei: max_priority_fee_per_gas.map(|v| v.to_string()),
        max_priority_fee_per_gas_gwei: max_priority_fee_per_gas.map(format_gwei),
        fetched_at: Utc::now(),
    })
}
