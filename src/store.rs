// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Presentation state.
//!
//! The aggregator and orchestrator never hold view state themselves; they
//! write through a [`ViewSink`]. [`ViewStore`] is the in-memory sink the HTTP
//! layer reads back from. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::{AccountSnapshot, NetworkStatus};
use crate::transfer::TransferStatus;

/// Destination for published results.
#[async_trait]
pub trait ViewSink: Send + Sync {
    async fn publish_snapshot(&self, snapshot: AccountSnapshot);

    async fn publish_transfer_status(&self, status: TransferStatus);
}

#[derive(Default)]
struct ViewState {
    /// Keyed by lowercase address
    snapshots: HashMap<String, AccountSnapshot>,
    transfer: TransferStatus,
    network: Option<NetworkStatus>,
}

/// Latest snapshot per account, latest transfer status, latest network read.
#[derive(Clone, Default)]
pub struct ViewStore {
    inner: Arc<RwLock<ViewState>>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest_snapshot(&self, address: &str) -> Option<AccountSnapshot> {
        self.inner
            .read()
            .await
            .snapshots
            .get(&address.to_ascii_lowercase())
            .cloned()
    }

    pub async fn transfer_status(&self) -> TransferStatus {
        self.inner.read().await.transfer.clone()
    }

    pub async fn record_network(&self, status: NetworkStatus) {
        self.inner.write().await.network = Some(status);
    }

    pub async fn latest_network(&self) -> Option<NetworkStatus> {
        self.inner.read().await.network.clone()
    }
}

#[async_trait]
impl ViewSink for ViewStore {
    async fn publish_snapshot(&self, snapshot: AccountSnapshot) {
        let key = snapshot.address.to_ascii_lowercase();
        let mut state = self.inner.write().await;
        // A slower, older read must not replace a newer one.
        if let Some(existing) = state.snapshots.get(&key) {
            if existing.fetched_at > snapshot.fetched_at {
                return;
            }
        }
        state.snapshots.insert(key, snapshot);
    }

    async fn publish_transfer_status(&self, status: TransferStatus) {
        self.inner.write().await.transfer = status;
    }
}
