// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM JSON-RPC client for account reads and transfer submission.
//!
//! [`ChainClient`] is the capability set the aggregator and orchestrator
//! depend on; [`EvmClient`] implements it over an alloy HTTP provider.
//! Clients are bound to one endpoint and created through a
//! [`ChainConnector`], since every request names its own endpoint.

use std::sync::Arc;
use std::time::Duration;

use alloy::{
    eips::BlockNumberOrTag,
    network::TransactionBuilder,
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};
use async_trait::async_trait;
use url::Url;

use super::ens;
use super::erc20::{Erc20Contract, IERC20};
use super::signing::SigningKey;
use super::types::*;

/// Chain capabilities for one endpoint. Every method is an independent
/// network operation and may fail on its own.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Endpoint this client talks to.
    fn endpoint(&self) -> &Url;

    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError>;

    async fn get_network(&self) -> Result<NetworkInfo, ChainClientError>;

    /// Transaction count including the pending pool (next usable nonce).
    async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainClientError>;

    /// Best-effort reverse name lookup.
    async fn lookup_address(&self, address: Address) -> Result<Option<String>, ChainClientError>;

    async fn get_fee_data(&self) -> Result<FeeEstimate, ChainClientError>;

    async fn get_block_number(&self) -> Result<u64, ChainClientError>;

    async fn get_transaction(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<TransactionInfo>, ChainClientError>;

    async fn token_symbol(&self, token: Address) -> Result<String, ChainClientError>;

    async fn token_name(&self, token: Address) -> Result<String, ChainClientError>;

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainClientError>;

    async fn token_balance_of(&self, token: Address, owner: Address)
        -> Result<U256, ChainClientError>;

    async fn estimate_token_transfer_gas(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, ChainClientError>;

    /// Sign and broadcast a native transfer. Returns once the node accepted it.
    async fn send_native_transfer(
        &self,
        key: &SigningKey,
        transfer: NativeTransfer,
    ) -> Result<TxHash, ChainClientError>;

    /// Sign and broadcast an ERC-20 transfer. Returns once the node accepted it.
    async fn send_token_transfer(
        &self,
        key: &SigningKey,
        transfer: TokenTransfer,
    ) -> Result<TxHash, ChainClientError>;

    /// Wait until the transaction is mined. Has no timeout of its own.
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainClientError>;
}

/// Creates [`ChainClient`]s bound to a given endpoint.
pub trait ChainConnector: Send + Sync {
    fn connect(&self, endpoint: &Url) -> Result<Arc<dyn ChainClient>, ChainClientError>;
}

/// Receipt polling parameters.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    /// Delay between `eth_getTransactionReceipt` calls
    pub poll_interval: Duration,
    /// Consecutive polling errors tolerated before giving up
    pub max_rpc_errors: u32,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_rpc_errors: 5,
        }
    }
}

/// Connector producing alloy-backed [`EvmClient`]s.
#[derive(Debug, Clone, Default)]
pub struct EvmConnector {
    policy: ConfirmationPolicy,
}

impl EvmConnector {
    pub fn new(policy: ConfirmationPolicy) -> Self {
        Self { policy }
    }
}

impl ChainConnector for EvmConnector {
    fn connect(&self, endpoint: &Url) -> Result<Arc<dyn ChainClient>, ChainClientError> {
        Ok(Arc::new(EvmClient::new(endpoint.clone(), self.policy)?))
    }
}

/// EVM client over an alloy HTTP provider.
pub struct EvmClient {
    endpoint: Url,
    provider: DynProvider,
    policy: ConfirmationPolicy,
}

impl EvmClient {
    /// Create a read-only client for `endpoint`.
    pub fn new(endpoint: Url, policy: ConfirmationPolicy) -> Result<Self, ChainClientError> {
        match endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ChainClientError::InvalidRpcUrl(format!(
                    "Unsupported scheme `{other}`"
                )))
            }
        }

        let provider = ProviderBuilder::new().connect_http(endpoint.clone()).erased();

        Ok(Self {
            endpoint,
            provider,
            policy,
        })
    }

    fn token(&self, token: Address) -> Erc20Contract<DynProvider> {
        Erc20Contract::new(&self.provider, token)
    }

    /// Sign and broadcast through a wallet-backed provider.
    async fn send(
        &self,
        key: &SigningKey,
        tx: TransactionRequest,
    ) -> Result<TxHash, ChainClientError> {
        let provider = ProviderBuilder::new()
            .wallet(key.wallet())
            .connect_http(self.endpoint.clone());

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| match e.as_error_resp() {
                Some(payload) => ChainClientError::SubmissionRejected(payload.message.to_string()),
                None => ChainClientError::RpcError(format!("Failed to send: {}", e)),
            })?;

        Ok(*pending.tx_hash())
    }
}

fn with_pricing(tx: TransactionRequest, pricing: GasPricing) -> TransactionRequest {
    match pricing {
        GasPricing::Legacy { gas_price } => tx.with_gas_price(gas_price),
        GasPricing::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => tx
            .with_max_fee_per_gas(max_fee_per_gas)
            .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
    }
}

fn rpc_err(e: impl std::fmt::Display) -> ChainClientError {
    ChainClientError::RpcError(e.to_string())
}

#[async_trait]
impl ChainClient for EvmClient {
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError> {
        self.provider.get_balance(address).await.map_err(rpc_err)
    }

    async fn get_network(&self) -> Result<NetworkInfo, ChainClientError> {
        let chain_id = self.provider.get_chain_id().await.map_err(rpc_err)?;
        Ok(NetworkInfo::from_chain_id(chain_id))
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainClientError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(rpc_err)
    }

    async fn lookup_address(&self, address: Address) -> Result<Option<String>, ChainClientError> {
        ens::lookup_address(&self.provider, address).await
    }

    async fn get_fee_data(&self) -> Result<FeeEstimate, ChainClientError> {
        let (gas_price, block, priority) = tokio::join!(
            async { self.provider.get_gas_price().await },
            async {
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Latest)
                    .await
            },
            async { self.provider.get_max_priority_fee_per_gas().await },
        );

        let gas_price = gas_price.map_err(rpc_err)?;

        // Fee-market fields only when the chain reports a base fee
        let base_fee = match block {
            Ok(Some(block)) => block.header.base_fee_per_gas.map(|f| f as u128),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Latest block unavailable, using legacy pricing");
                None
            }
        };

        let Some(base_fee) = base_fee else {
            return Ok(FeeEstimate {
                gas_price: Some(gas_price),
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
            });
        };

        let priority_fee = priority.unwrap_or(DEFAULT_PRIORITY_FEE_WEI);
        // Max fee = 2 * base_fee + priority_fee (allows for base fee increase)
        let max_fee = base_fee.saturating_mul(2).saturating_add(priority_fee);

        Ok(FeeEstimate {
            gas_price: Some(gas_price),
            max_fee_per_gas: Some(max_fee),
            max_priority_fee_per_gas: Some(priority_fee),
        })
    }

    async fn get_block_number(&self) -> Result<u64, ChainClientError> {
        self.provider.get_block_number().await.map_err(rpc_err)
    }

    async fn get_transaction(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<TransactionInfo>, ChainClientError> {
        use alloy::consensus::Transaction as ConsensusTx;
        use alloy::network::TransactionResponse;

        let tx = self
            .provider
            .get_transaction_by_hash(tx_hash)
            .await
            .map_err(rpc_err)?;

        Ok(tx.map(|tx| TransactionInfo {
            tx_hash: format!("{:?}", tx_hash),
            from: TransactionResponse::from(&tx).to_checksum(None),
            to: ConsensusTx::to(&tx).map(|a| a.to_checksum(None)),
            value_wei: ConsensusTx::value(&tx).to_string(),
            nonce: ConsensusTx::nonce(&tx),
            gas_limit: ConsensusTx::gas_limit(&tx),
            block_number: TransactionResponse::block_number(&tx),
        }))
    }

    async fn token_symbol(&self, token: Address) -> Result<String, ChainClientError> {
        self.token(token).symbol().await
    }

    async fn token_name(&self, token: Address) -> Result<String, ChainClientError> {
        self.token(token).name().await
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainClientError> {
        self.token(token).decimals().await
    }

    async fn token_balance_of(
        &self,
        token: Address,
        owner: Address,
    ) -> Result<U256, ChainClientError> {
        self.token(token).balance_of(owner).await
    }

    async fn estimate_token_transfer_gas(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, ChainClientError> {
        self.token(token).estimate_transfer(from, to, amount).await
    }

    async fn send_native_transfer(
        &self,
        key: &SigningKey,
        transfer: NativeTransfer,
    ) -> Result<TxHash, ChainClientError> {
        let tx = TransactionRequest::default()
            .with_from(key.address())
            .with_to(transfer.to)
            .with_value(transfer.value)
            .with_nonce(transfer.nonce)
            .with_gas_limit(transfer.gas_limit);

        self.send(key, with_pricing(tx, transfer.pricing)).await
    }

    async fn send_token_transfer(
        &self,
        key: &SigningKey,
        transfer: TokenTransfer,
    ) -> Result<TxHash, ChainClientError> {
        // Encode the transfer(to, amount) call
        let call = IERC20::transferCall {
            to: transfer.to,
            amount: transfer.amount,
        };

        let tx = TransactionRequest::default()
            .with_from(key.address())
            .with_to(transfer.token)
            .with_input(call.abi_encode())
            .with_nonce(transfer.nonce)
            .with_gas_limit(transfer.gas_limit);

        self.send(key, with_pricing(tx, transfer.pricing)).await
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainClientError> {
        let mut consecutive_errors = 0u32;

        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    return mined_receipt(
                        tx_hash,
                        receipt.block_number,
                        receipt.gas_used as u64,
                        receipt.status(),
                    );
                }
                Ok(None) => consecutive_errors = 0,
                Err(e) => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        attempt = consecutive_errors,
                        error = %e,
                        "Receipt poll failed"
                    );
                    if consecutive_errors >= self.policy.max_rpc_errors {
                        return Err(ChainClientError::RpcError(format!(
                            "Failed to get receipt: {}",
                            e
                        )));
                    }
                }
            }

            tokio::time::sleep(self.policy.poll_interval).await;
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    /// The node refused the transaction before broadcast.
    #[error("Transaction rejected: {0}")]
    SubmissionRejected(String),
}

/// A receipt the node returned is mined, so it must name its block.
fn mined_receipt(
    tx_hash: TxHash,
    block_number: Option<u64>,
    gas_used: u64,
    success: bool,
) -> Result<TxReceipt, ChainClientError> {
    let block_number = block_number.ok_or_else(|| {
        ChainClientError::RpcError(format!("Receipt for {} has no block number", tx_hash))
    })?;
    Ok(TxReceipt {
        tx_hash,
        block_number,
        gas_used,
        success,
    })
}
