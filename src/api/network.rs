// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{account::NetworkStatus, error::ApiError, state::AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct EndpointQuery {
    /// JSON-RPC endpoint. The configured default when absent.
    pub endpoint: Option<String>,
}

/// Network identity, latest block and current fees of an endpoint.
#[utoipa::path(
    get,
    path = "/v1/network",
    tag = "Network",
    params(EndpointQuery),
    responses(
        (status = 200, description = "Network status read", body = NetworkStatus),
        (status = 400, description = "Invalid endpoint"),
        (status = 503, description = "Endpoint unavailable")
    )
)]
pub async fn get_network(
    State(state): State<AppState>,
    Query(query): Query<EndpointQuery>,
) -> Result<Json<NetworkStatus>, ApiError> {
    let endpoint = state.endpoint_or_default(query.endpoint.as_deref());
    let status = state.aggregator.network_status(&endpoint).await?;
    state.store.record_network(status.clone()).await;
    Ok(Json(status))
}

/// Last network status read through this console, without reading the chain.
#[utoipa::path(
    get,
    path = "/v1/network/latest",
    tag = "Network",
    responses(
        (status = 200, description = "Latest network status", body = NetworkStatus),
        (status = 404, description = "No network status read yet")
    )
)]
pub async fn get_latest_network(
    State(state): State<AppState>,
) -> Result<Json<NetworkStatus>, ApiError> {
    state
        .store
        .latest_network()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No network status has been read yet"))
}
