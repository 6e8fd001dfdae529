// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::account::AccountSnapshotAggregator;
use crate::blockchain::{ChainConnector, EvmConnector};
use crate::config::Config;
use crate::store::ViewStore;
use crate::transfer::TransferOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: ViewStore,
    pub connector: Arc<dyn ChainConnector>,
    pub aggregator: AccountSnapshotAggregator,
    pub orchestrator: Arc<TransferOrchestrator>,
}

impl AppState {
    /// Wire the services around a connector. Published results land in a
    /// fresh [`ViewStore`].
    pub fn new(config: Config, connector: Arc<dyn ChainConnector>) -> Self {
        let store = ViewStore::new();
        let orchestrator =
            TransferOrchestrator::new(connector.clone(), Arc::new(store.clone()));
        Self {
            config: Arc::new(config),
            store,
            aggregator: AccountSnapshotAggregator::new(connector.clone()),
            connector,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Production wiring with the alloy-backed connector.
    pub fn from_config(config: Config) -> Self {
        let connector = Arc::new(EvmConnector::new(config.confirmation));
        Self::new(config, connector)
    }

    /// The request's endpoint, or the configured default.
    pub fn endpoint_or_default(&self, endpoint: Option<&str>) -> String {
        match endpoint.map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => self.config.default_rpc_url.clone(),
        }
    }
}
