// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted in-memory chain and view sink for unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use url::Url;

use crate::account::AccountSnapshot;
use crate::blockchain::{
    ChainClient, ChainClientError, ChainConnector, FeeEstimate, NativeTransfer, NetworkInfo,
    SigningKey, TokenTransfer, TransactionInfo, TxReceipt,
};
use crate::config::Config;
use crate::state::AppState;
use crate::store::ViewSink;
use crate::transfer::TransferStatus;

/// Account controlled by `signing::tests::TEST_KEY`.
pub const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TOKEN: &str = "0x5555555555555555555555555555555555555555";
pub const ENDPOINT: &str = "http://localhost:8545";

/// Hash returned for every accepted submission.
pub const TX_HASH: TxHash = B256::repeat_byte(0xab);

/// Block a scripted confirmation lands in.
pub const CONFIRMED_BLOCK: u64 = 101;

/// How `await_confirmation` behaves.
#[derive(Debug, Clone)]
pub enum Confirmation {
    Mined { success: bool },
    Error(ChainClientError),
    /// Never resolves, leaving the transfer pending.
    Never,
}

/// Number of calls per capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    pub connect: usize,
    pub get_balance: usize,
    pub get_network: usize,
    pub get_transaction_count: usize,
    pub lookup_address: usize,
    pub get_fee_data: usize,
    pub get_block_number: usize,
    pub get_transaction: usize,
    pub token_symbol: usize,
    pub token_name: usize,
    pub token_decimals: usize,
    pub token_balance_of: usize,
    pub estimate_token_transfer_gas: usize,
    pub send_native_transfer: usize,
    pub send_token_transfer: usize,
    pub await_confirmation: usize,
}

impl Calls {
    /// Chain calls, not counting `connect`.
    pub fn total(&self) -> usize {
        self.get_balance
            + self.get_network
            + self.get_transaction_count
            + self.lookup_address
            + self.get_fee_data
            + self.get_block_number
            + self.get_transaction
            + self.token_symbol
            + self.token_name
            + self.token_decimals
            + self.token_balance_of
            + self.estimate_token_transfer_gas
            + self.send_native_transfer
            + self.send_token_transfer
            + self.await_confirmation
    }
}

struct MockState {
    balance: Result<U256, ChainClientError>,
    network: Result<NetworkInfo, ChainClientError>,
    nonce: Result<u64, ChainClientError>,
    display_name: Result<Option<String>, ChainClientError>,
    fees: Result<FeeEstimate, ChainClientError>,
    block_number: Result<u64, ChainClientError>,
    transaction: Option<TransactionInfo>,
    token_symbol: Result<String, ChainClientError>,
    token_name: Result<String, ChainClientError>,
    token_decimals: Result<u8, ChainClientError>,
    token_balance: Result<U256, ChainClientError>,
    token_gas: Result<u64, ChainClientError>,
    send: Result<TxHash, ChainClientError>,
    confirmation: Confirmation,
    sent_native: Vec<NativeTransfer>,
    sent_token: Vec<TokenTransfer>,
    calls: Calls,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            // 10 ether
            balance: Ok(U256::from(10_000_000_000_000_000_000u128)),
            network: Ok(NetworkInfo::from_chain_id(11155111)),
            nonce: Ok(0),
            display_name: Ok(None),
            fees: Ok(FeeEstimate {
                gas_price: Some(20_000_000_000),
                max_fee_per_gas: Some(30_000_000_000),
                max_priority_fee_per_gas: Some(1_500_000_000),
            }),
            block_number: Ok(100),
            transaction: None,
            token_symbol: Ok("TST".to_string()),
            token_name: Ok("Test Token".to_string()),
            token_decimals: Ok(18),
            token_balance: Ok(U256::ZERO),
            token_gas: Ok(52_000),
            send: Ok(TX_HASH),
            confirmation: Confirmation::Mined { success: true },
            sent_native: Vec::new(),
            sent_token: Vec::new(),
            calls: Calls::default(),
        }
    }
}

/// Shared scripted chain. Clones observe the same state.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<MockState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Calls {
        self.state().calls.clone()
    }

    pub fn sent_native(&self) -> Vec<NativeTransfer> {
        self.state().sent_native.clone()
    }

    pub fn sent_token(&self) -> Vec<TokenTransfer> {
        self.state().sent_token.clone()
    }

    pub fn set_balance(&self, balance: U256) {
        self.state().balance = Ok(balance);
    }

    pub fn set_nonce(&self, nonce: u64) {
        self.state().nonce = Ok(nonce);
    }

    pub fn set_display_name(&self, name: Option<&str>) {
        self.state().display_name = Ok(name.map(str::to_string));
    }

    pub fn set_fees(&self, fees: FeeEstimate) {
        self.state().fees = Ok(fees);
    }

    pub fn set_token(&self, decimals: u8, balance: U256) {
        let mut state = self.state();
        state.token_decimals = Ok(decimals);
        state.token_balance = Ok(balance);
    }

    pub fn set_transaction(&self, tx: TransactionInfo) {
        self.state().transaction = Some(tx);
    }

    pub fn set_confirmation(&self, confirmation: Confirmation) {
        self.state().confirmation = confirmation;
    }

    pub fn fail_balance(&self, err: ChainClientError) {
        self.state().balance = Err(err);
    }

    pub fn fail_network(&self, err: ChainClientError) {
        self.state().network = Err(err);
    }

    pub fn fail_nonce(&self, err: ChainClientError) {
        self.state().nonce = Err(err);
    }

    pub fn fail_lookup(&self, err: ChainClientError) {
        self.state().display_name = Err(err);
    }

    pub fn fail_fee_data(&self, err: ChainClientError) {
        self.state().fees = Err(err);
    }

    pub fn fail_token_decimals(&self, err: ChainClientError) {
        self.state().token_decimals = Err(err);
    }

    pub fn fail_send(&self, err: ChainClientError) {
        self.state().send = Err(err);
    }
}

/// Hands out [`MockClient`]s bound to the requested endpoint.
pub struct MockConnector {
    chain: MockChain,
}

impl MockConnector {
    pub fn new(chain: MockChain) -> Self {
        Self { chain }
    }
}

impl ChainConnector for MockConnector {
    fn connect(&self, endpoint: &Url) -> Result<Arc<dyn ChainClient>, ChainClientError> {
        self.chain.state().calls.connect += 1;
        Ok(Arc::new(MockClient {
            chain: self.chain.clone(),
            endpoint: endpoint.clone(),
        }))
    }
}

pub struct MockClient {
    chain: MockChain,
    endpoint: Url,
}

impl MockClient {
    fn record<T>(&self, read: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.chain.state();
        read(&mut state)
    }
}

#[async_trait]
impl ChainClient for MockClient {
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, ChainClientError> {
        self.record(|s| {
            s.calls.get_balance += 1;
            s.balance.clone()
        })
    }

    async fn get_network(&self) -> Result<NetworkInfo, ChainClientError> {
        self.record(|s| {
            s.calls.get_network += 1;
            s.network.clone()
        })
    }

    async fn get_transaction_count(&self, _address: Address) -> Result<u64, ChainClientError> {
        self.record(|s| {
            s.calls.get_transaction_count += 1;
            s.nonce.clone()
        })
    }

    async fn lookup_address(&self, _address: Address) -> Result<Option<String>, ChainClientError> {
        self.record(|s| {
            s.calls.lookup_address += 1;
            s.display_name.clone()
        })
    }

    async fn get_fee_data(&self) -> Result<FeeEstimate, ChainClientError> {
        self.record(|s| {
            s.calls.get_fee_data += 1;
            s.fees.clone()
        })
    }

    async fn get_block_number(&self) -> Result<u64, ChainClientError> {
        self.record(|s| {
            s.calls.get_block_number += 1;
            s.block_number.clone()
        })
    }

    async fn get_transaction(
        &self,
        _tx_hash: TxHash,
    ) -> Result<Option<TransactionInfo>, ChainClientError> {
        self.record(|s| {
            s.calls.get_transaction += 1;
            Ok(s.transaction.clone())
        })
    }

    async fn token_symbol(&self, _token: Address) -> Result<String, ChainClientError> {
        self.record(|s| {
            s.calls.token_symbol += 1;
            s.token_symbol.clone()
        })
    }

    async fn token_name(&self, _token: Address) -> Result<String, ChainClientError> {
        self.record(|s| {
            s.calls.token_name += 1;
            s.token_name.clone()
        })
    }

    async fn token_decimals(&self, _token: Address) -> Result<u8, ChainClientError> {
        self.record(|s| {
            s.calls.token_decimals += 1;
            s.token_decimals.clone()
        })
    }

    async fn token_balance_of(
        &self,
        _token: Address,
        _owner: Address,
    ) -> Result<U256, ChainClientError> {
        self.record(|s| {
            s.calls.token_balance_of += 1;
            s.token_balance.clone()
        })
    }

    async fn estimate_token_transfer_gas(
        &self,
        _token: Address,
        _from: Address,
        _to: Address,
        _amount: U256,
    ) -> Result<u64, ChainClientError> {
        self.record(|s| {
            s.calls.estimate_token_transfer_gas += 1;
            s.token_gas.clone()
        })
    }

    async fn send_native_transfer(
        &self,
        _key: &SigningKey,
        transfer: NativeTransfer,
    ) -> Result<TxHash, ChainClientError> {
        self.record(|s| {
            s.calls.send_native_transfer += 1;
            s.sent_native.push(transfer);
            s.send.clone()
        })
    }

    async fn send_token_transfer(
        &self,
        _key: &SigningKey,
        transfer: TokenTransfer,
    ) -> Result<TxHash, ChainClientError> {
        self.record(|s| {
            s.calls.send_token_transfer += 1;
            s.sent_token.push(transfer);
            s.send.clone()
        })
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainClientError> {
        let confirmation = self.record(|s| {
            s.calls.await_confirmation += 1;
            s.confirmation.clone()
        });
        match confirmation {
            Confirmation::Mined { success } => Ok(TxReceipt {
                tx_hash,
                block_number: CONFIRMED_BLOCK,
                gas_used: 21_000,
                success,
            }),
            Confirmation::Error(e) => Err(e),
            Confirmation::Never => std::future::pending().await,
        }
    }
}

/// View sink that keeps everything it was given, in order.
#[derive(Clone, Default)]
pub struct RecordingSink {
    snapshots: Arc<Mutex<Vec<AccountSnapshot>>>,
    statuses: Arc<Mutex<Vec<TransferStatus>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<TransferStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl ViewSink for RecordingSink {
    async fn publish_snapshot(&self, snapshot: AccountSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }

    async fn publish_transfer_status(&self, status: TransferStatus) {
        self.statuses.lock().unwrap().push(status);
    }
}

/// Application state wired to a scripted chain.
pub fn app_state(chain: &MockChain) -> AppState {
    AppState::new(Config::default(), Arc::new(MockConnector::new(chain.clone())))
}

/// Read a JSON response body.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
