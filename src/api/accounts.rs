// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account snapshot endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    account::{AccountSnapshot, SnapshotQuery},
    blockchain::parse_address,
    error::ApiError,
    state::AppState,
    store::ViewSink,
};

/// Query parameters for a snapshot.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AccountQuery {
    /// JSON-RPC endpoint. The configured default when absent.
    pub endpoint: Option<String>,
    /// ERC-20 contract to include in the snapshot
    pub token: Option<String>,
}

/// Read a fresh snapshot of an account.
///
/// Balance, network and nonce are read together with the reverse name
/// lookup (and the token fields when `token` is given). The result is
/// published and returned.
#[utoipa::path(
    get,
    path = "/v1/accounts/{address}",
    tag = "Accounts",
    params(
        ("address" = String, Path, description = "Account address"),
        AccountQuery
    ),
    responses(
        (status = 200, description = "Snapshot read", body = AccountSnapshot),
        (status = 400, description = "Invalid address, endpoint or token contract"),
        (status = 502, description = "One or more mandatory reads failed"),
        (status = 503, description = "Endpoint unavailable")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<AccountSnapshot>, ApiError> {
    let mut snapshot_query =
        SnapshotQuery::native(address, state.endpoint_or_default(query.endpoint.as_deref()));
    if let Some(token) = query.token.filter(|t| !t.trim().is_empty()) {
        snapshot_query = snapshot_query.with_token(token);
    }

    let snapshot = state.aggregator.refresh(&snapshot_query).await?;
    state.store.publish_snapshot(snapshot.clone()).await;

    Ok(Json(snapshot))
}

/// Last published snapshot of an account, without reading the chain.
#[utoipa::path(
    get,
    path = "/v1/accounts/{address}/latest",
    tag = "Accounts",
    params(
        ("address" = String, Path, description = "Account address")
    ),
    responses(
        (status = 200, description = "Latest snapshot", body = AccountSnapshot),
        (status = 400, description = "Invalid address"),
        (status = 404, description = "No snapshot published yet")
    )
)]
pub async fn get_latest_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AccountSnapshot>, ApiError> {
    parse_address(&address)?;

    state
        .store
        .latest_snapshot(&address)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No snapshot for this account"))
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::blockchain::ChainClientError;
    use crate::testing::{app_state, body_json, MockChain, ALICE, TOKEN};
    use alloy::primitives::U256;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn refresh_returns_and_publishes_snapshot() {
        let chain = MockChain::new();
        chain.set_nonce(4);
        let app = router(app_state(&chain));

        let response = app
            .clone()
            .oneshot(get(&format!("/v1/accounts/{ALICE}?endpoint=http://localhost:8545")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["nonce"], 4);
        assert_eq!(body["balance"], "10");
        assert_eq!(body["endpoint"], "http://localhost:8545/");

        let response = app
            .oneshot(get(&format!("/v1/accounts/{}/latest", ALICE.to_lowercase())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["nonce"], 4);
    }

    #[tokio::test]
    async fn token_query_adds_token_position() {
        let chain = MockChain::new();
        chain.set_token(6, U256::from(1_250_000u64));
        let app = router(app_state(&chain));

        let response = app
            .oneshot(get(&format!("/v1/accounts/{ALICE}?token={TOKEN}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["token"]["balance"], "1.25");
    }

    #[tokio::test]
    async fn partial_failure_is_bad_gateway() {
        let chain = MockChain::new();
        chain.fail_network(ChainClientError::RpcError("down".to_string()));
        let app = router(app_state(&chain));

        let response = app
            .clone()
            .oneshot(get(&format!("/v1/accounts/{ALICE}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["details"]["failed_fields"][0], "network");

        // nothing was published
        let response = app
            .oneshot(get(&format!("/v1/accounts/{ALICE}/latest")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_address_is_bad_request() {
        let chain = MockChain::new();
        let app = router(app_state(&chain));

        let response = app.oneshot(get("/v1/accounts/0x1234")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(chain.calls().connect, 0);
    }
}
