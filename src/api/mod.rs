// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    account::{AccountSnapshot, NetworkStatus, SnapshotField, TokenSnapshot},
    blockchain::{tools::GeneratedWallet, TransactionInfo},
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod network;
pub mod tools;
pub mod transactions;
pub mod transfers;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/accounts/{address}", get(accounts::get_account))
        .route("/accounts/{address}/latest", get(accounts::get_latest_account))
        .route("/network", get(network::get_network))
        .route("/network/latest", get(network::get_latest_network))
        .route("/transactions/{tx_hash}", get(transactions::get_transaction))
        .route("/transfers", post(transfers::create_transfer))
        .route("/transfers/status", get(transfers::get_transfer_status))
        .route("/tools/keccak256", post(tools::keccak256))
        .route("/tools/wallets", post(tools::create_wallet));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        accounts::get_account,
        accounts::get_latest_account,
        network::get_network,
        network::get_latest_network,
        transactions::get_transaction,
        transfers::create_transfer,
        transfers::get_transfer_status,
        tools::keccak256,
        tools::create_wallet
    ),
    components(
        schemas(
            AccountSnapshot,
            TokenSnapshot,
            SnapshotField,
            NetworkStatus,
            TransactionInfo,
            GeneratedWallet,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            transfers::CreateTransferRequest,
            transfers::TransferStatusResponse,
            tools::HashRequest,
            tools::HashResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Accounts", description = "Account snapshots"),
        (name = "Network", description = "Endpoint identity and fees"),
        (name = "Transactions", description = "Transaction lookup"),
        (name = "Transfers", description = "Native and ERC-20 transfers"),
        (name = "Tools", description = "Offline utilities")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{app_state, body_json, MockChain};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let app = router(app_state(&MockChain::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        assert!(doc["paths"]["/v1/accounts/{address}"].is_object());
        assert!(doc["paths"]["/v1/transfers"].is_object());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = router(app_state(&MockChain::new()));
        let response = app
            .oneshot(Request::builder().uri("/v2/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
