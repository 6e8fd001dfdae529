// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer workflow: validate, price, submit, confirm, refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;
use uuid::Uuid;

use super::request::{Asset, TransferRequest, ValidatedTransfer};
use super::{TransferError, TransferStatus};
use crate::account::{AccountSnapshotAggregator, SnapshotQuery};
use crate::blockchain::{
    checksum, parse_positive_amount, ChainClient, ChainClientError, ChainConnector, FeeEstimate,
    GasPricing, NativeTransfer, TokenTransfer, TxReceipt, NATIVE_TRANSFER_GAS,
};
use crate::store::ViewSink;

/// Statuses emitted by one transfer, ending after the terminal one.
pub type TransferStream = ReceiverStream<TransferStatus>;

/// Every status of one transfer fits without waiting on the reader.
const STATUS_BUFFER: usize = 8;

/// Runs transfers one at a time.
pub struct TransferOrchestrator {
    connector: Arc<dyn ChainConnector>,
    aggregator: AccountSnapshotAggregator,
    sink: Arc<dyn ViewSink>,
    in_flight: Arc<AtomicBool>,
}

impl TransferOrchestrator {
    pub fn new(connector: Arc<dyn ChainConnector>, sink: Arc<dyn ViewSink>) -> Self {
        Self {
            aggregator: AccountSnapshotAggregator::new(connector.clone()),
            connector,
            sink,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a transfer has not yet reached a terminal status.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Start a transfer on a background task.
    ///
    /// Returns `AlreadyInProgress` without any network access while another
    /// transfer is non-terminal. Every other failure is reported in-stream.
    /// Dropping the stream does not stop the transfer.
    pub fn submit(&self, request: TransferRequest) -> Result<TransferStream, TransferError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Transfer rejected: another transfer is in progress");
            return Err(TransferError::AlreadyInProgress);
        }

        let (tx, rx) = mpsc::channel(STATUS_BUFFER);
        let run = TransferRun {
            connector: self.connector.clone(),
            aggregator: self.aggregator.clone(),
            sink: self.sink.clone(),
            statuses: tx,
            guard: Some(InFlightGuard(self.in_flight.clone())),
        };
        let span = tracing::info_span!("transfer", transfer_id = %Uuid::new_v4());
        tokio::spawn(run.drive(request).instrument(span));

        Ok(ReceiverStream::new(rx))
    }
}

/// Clears the in-flight flag when dropped, including on task panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A confirmed transfer and the snapshot to refresh afterwards.
struct Settled {
    tx_hash: String,
    block_number: u64,
    refresh: SnapshotQuery,
}

struct TransferRun {
    connector: Arc<dyn ChainConnector>,
    aggregator: AccountSnapshotAggregator,
    sink: Arc<dyn ViewSink>,
    statuses: mpsc::Sender<TransferStatus>,
    guard: Option<InFlightGuard>,
}

impl TransferRun {
    async fn drive(mut self, request: TransferRequest) {
        self.emit(TransferStatus::Idle).await;
        self.emit(TransferStatus::Validating).await;

        let outcome = match request.validate() {
            Ok(transfer) => self.execute(transfer).await,
            Err(e) => Err(e),
        };

        let (terminal, refresh) = match outcome {
            Ok(settled) => (
                TransferStatus::Confirmed {
                    tx_hash: settled.tx_hash,
                    block_number: settled.block_number,
                },
                Some(settled.refresh),
            ),
            Err(reason) => {
                tracing::warn!(kind = reason.kind(), error = %reason, "Transfer failed");
                (TransferStatus::Failed { reason }, None)
            }
        };

        // The view holds the terminal status before another submit can start.
        self.publish(&terminal).await;
        self.guard.take();
        self.send(terminal).await;

        if let Some(query) = refresh {
            match self.aggregator.refresh(&query).await {
                Ok(snapshot) => self.sink.publish_snapshot(snapshot).await,
                Err(e) => {
                    tracing::warn!(address = %query.address, error = %e, "Post-transfer refresh failed")
                }
            }
        }
    }

    async fn emit(&self, status: TransferStatus) {
        self.publish(&status).await;
        self.send(status).await;
    }

    async fn publish(&self, status: &TransferStatus) {
        tracing::info!(state = status.name(), tx_hash = status.tx_hash(), "Transfer status");
        self.sink.publish_transfer_status(status.clone()).await;
    }

    async fn send(&self, status: TransferStatus) {
        // The caller may have stopped listening; the transfer carries on.
        let _ = self.statuses.send(status).await;
    }

    async fn execute(&self, transfer: ValidatedTransfer) -> Result<Settled, TransferError> {
        let ValidatedTransfer {
            recipient,
            amount,
            asset,
            endpoint,
            key,
        } = transfer;
        let sender = key.address();
        let endpoint_str = endpoint.to_string();
        let net = |e: ChainClientError| TransferError::from_chain(&endpoint_str, e);

        self.emit(TransferStatus::Submitting).await;

        let client = self.connector.connect(&endpoint).map_err(net)?;

        let tx_hash = match asset {
            Asset::Native { value } => {
                let (fees, nonce) = tokio::join!(
                    client.get_fee_data(),
                    client.get_transaction_count(sender)
                );
                let pricing = gas_pricing(fees.map_err(net)?, &endpoint_str)?;
                let gas_limit = NATIVE_TRANSFER_GAS;
                check_native_funds(client.as_ref(), sender, value, pricing, gas_limit).await?;
                let nonce = nonce.map_err(net)?;

                tracing::info!(
                    from = %sender,
                    to = %recipient,
                    value = %value,
                    nonce,
                    "Submitting native transfer"
                );
                client
                    .send_native_transfer(
                        &key,
                        NativeTransfer {
                            to: recipient,
                            value,
                            nonce,
                            gas_limit,
                            pricing,
                        },
                    )
                    .await
                    .map_err(net)?
            }
            Asset::Token { contract } => {
                let (fees, decimals) =
                    tokio::join!(client.get_fee_data(), client.token_decimals(contract));
                let pricing = gas_pricing(fees.map_err(net)?, &endpoint_str)?;
                let decimals = decimals.map_err(net)?;

                let value = parse_positive_amount(&amount, decimals)
                    .map_err(|e| TransferError::validation(format!("Amount: {}", e)))?;
                let available = client
                    .token_balance_of(contract, sender)
                    .await
                    .map_err(net)?;
                if available < value {
                    return Err(TransferError::InsufficientFunds {
                        required: value.to_string(),
                        available: available.to_string(),
                    });
                }

                let gas_limit = client
                    .estimate_token_transfer_gas(contract, sender, recipient, value)
                    .await
                    .map_err(net)?;
                let nonce = client
                    .get_transaction_count(sender)
                    .await
                    .map_err(net)?;

                tracing::info!(
                    from = %sender,
                    to = %recipient,
                    token = %contract,
                    amount = %value,
                    nonce,
                    gas_limit,
                    "Submitting token transfer"
                );
                client
                    .send_token_transfer(
                        &key,
                        TokenTransfer {
                            token: contract,
                            to: recipient,
                            amount: value,
                            nonce,
                            gas_limit,
                            pricing,
                        },
                    )
                    .await
                    .map_err(net)?
            }
        };
        drop(key);

        let tx_hash_str = format!("{:?}", tx_hash);
        self.emit(TransferStatus::Pending {
            tx_hash: tx_hash_str.clone(),
        })
        .await;

        let receipt = confirm(client.as_ref(), tx_hash).await.map_err(net)?;
        if !receipt.success {
            return Err(TransferError::ConfirmationFailed {
                tx_hash: tx_hash_str,
                block_number: receipt.block_number,
            });
        }

        let mut refresh = SnapshotQuery::native(checksum(&sender), endpoint_str.clone());
        if let Asset::Token { contract } = asset {
            refresh = refresh.with_token(checksum(&contract));
        }

        Ok(Settled {
            tx_hash: tx_hash_str,
            block_number: receipt.block_number,
            refresh,
        })
    }
}

fn gas_pricing(fees: FeeEstimate, endpoint: &str) -> Result<GasPricing, TransferError> {
    GasPricing::from_fee_data(&fees).ok_or_else(|| TransferError::Network {
        endpoint: endpoint.to_string(),
        message: "Node returned no usable fee data".to_string(),
    })
}

/// Compare the sender's balance with value plus the worst-case fee.
///
/// Advisory: the node has the final say, so a failed read is skipped.
async fn check_native_funds(
    client: &dyn ChainClient,
    sender: Address,
    value: U256,
    pricing: GasPricing,
    gas_limit: u64,
) -> Result<(), TransferError> {
    match client.get_balance(sender).await {
        Ok(available) => {
            let required = value.saturating_add(pricing.max_cost(gas_limit));
            if available < required {
                return Err(TransferError::InsufficientFunds {
                    required: required.to_string(),
                    available: available.to_string(),
                });
            }
            Ok(())
        }
        Err(e) => {
            tracing::warn!(address = %sender, error = %e, "Balance pre-check skipped");
            Ok(())
        }
    }
}

async fn confirm(
    client: &dyn ChainClient,
    tx_hash: TxHash,
) -> Result<TxReceipt, ChainClientError> {
    let receipt = client.await_confirmation(tx_hash).await?;
    tracing::info!(
        tx_hash = %tx_hash,
        block_number = receipt.block_number,
        gas_used = receipt.gas_used,
        success = receipt.success,
        "Transaction mined"
    );
    Ok(receipt)
}
