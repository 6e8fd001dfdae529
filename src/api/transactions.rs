// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction lookup by hash.

use alloy::primitives::TxHash;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use url::Url;

use super::network::EndpointQuery;
use crate::{blockchain::TransactionInfo, error::ApiError, state::AppState};

/// Look up a transaction on an endpoint.
#[utoipa::path(
    get,
    path = "/v1/transactions/{tx_hash}",
    tag = "Transactions",
    params(
        ("tx_hash" = String, Path, description = "0x-prefixed transaction hash"),
        EndpointQuery
    ),
    responses(
        (status = 200, description = "Transaction found", body = TransactionInfo),
        (status = 400, description = "Invalid hash or endpoint"),
        (status = 404, description = "Transaction not known to the endpoint"),
        (status = 503, description = "Endpoint unavailable")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(tx_hash): Path<String>,
    Query(query): Query<EndpointQuery>,
) -> Result<Json<TransactionInfo>, ApiError> {
    let hash: TxHash = tx_hash
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid transaction hash"))?;
    let endpoint: Url = state
        .endpoint_or_default(query.endpoint.as_deref())
        .parse()
        .map_err(|e| ApiError::bad_request(format!("Invalid endpoint: {}", e)))?;

    let client = state.connector.connect(&endpoint)?;
    let tx = client.get_transaction(hash).await.map_err(|e| {
        tracing::warn!(tx_hash = %hash, endpoint = %endpoint, error = %e, "Transaction lookup failed");
        ApiError::from(e)
    })?;

    tx.map(Json)
        .ok_or_else(|| ApiError::not_found("Transaction not found"))
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::blockchain::TransactionInfo;
    use crate::testing::{app_state, body_json, MockChain, ALICE, BOB, TX_HASH};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn known_transaction_is_returned() {
        let chain = MockChain::new();
        chain.set_transaction(TransactionInfo {
            tx_hash: format!("{:?}", TX_HASH),
            from: ALICE.to_string(),
            to: Some(BOB.to_string()),
            value_wei: "1000".to_string(),
            nonce: 3,
            gas_limit: 21_000,
            block_number: Some(42),
        });
        let app = router(app_state(&chain));

        let response = app
            .oneshot(get(&format!("/v1/transactions/{:?}", TX_HASH)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["from"], ALICE);
        assert_eq!(body["block_number"], 42);
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let chain = MockChain::new();
        let app = router(app_state(&chain));

        let response = app
            .oneshot(get(&format!("/v1/transactions/{:?}", TX_HASH)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_hash_is_rejected_before_connecting() {
        let chain = MockChain::new();
        let app = router(app_state(&chain));

        let response = app.oneshot(get("/v1/transactions/0xabc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(chain.calls().connect, 0);
    }
}
