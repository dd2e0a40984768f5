//! HTTP routes for the node
//!
//! Routes:
//! - GET    /state       - book state plus recent trades
//! - POST   /order       - submit a local order
//! - DELETE /order/:id   - cancel a resting order
//! - GET    /events      - Server-Sent-Events stream
//! - POST   /gossip      - inbound gossip (peer-to-peer only)
//! - GET    /health      - liveness probe
//! - GET    /metrics     - meter readings

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use super::sse;

/// Create the node's router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/order", post(handlers::submit_order))
        .route("/order/:id", delete(handlers::cancel_order))
        .route("/events", get(sse::events))
        .route("/gossip", post(handlers::gossip))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::build_state;
    use crate::api::sse::wire_book_events;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use book::{BookConfig, OrderBook};
    use replica::{MemoryTransport, ReplicaNode};
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let (events, _) = broadcast::channel(64);
        let mut book = OrderBook::new(BookConfig::new("BTC-USD"));
        wire_book_events(&mut book, &events);
        let node = ReplicaNode::new("peer-test", book, Arc::new(MemoryTransport::new()));
        create_router(build_state(node, events))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn test_submit_then_read_state() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(post_json(
                "/order",
                r#"{"side":"sell","price":"100","quantity":"1"}"#,
            ))
            .await
            .expect("handler runs");
        assert_eq!(response.status(), StatusCode::OK);

        let submit = body_json(response).await;
        assert_eq!(submit["success"], Value::Bool(true));
        assert_eq!(submit["status"], "open");
        let order_id = submit["order_id"].as_str().expect("id assigned").to_string();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/state")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");
        let state = body_json(response).await;
        assert_eq!(state["pair"], "BTC-USD");
        assert_eq!(state["peer_id"], "peer-test");
        assert_eq!(state["asks"].as_array().map(|a| a.len()), Some(1));

        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/order/{order_id}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");
        let cancel = body_json(response).await;
        assert_eq!(cancel["ok"], Value::Bool(true));
        assert_eq!(cancel["cancelled"]["status"], "cancelled");
    }

    #[tokio::test]
    async fn test_invalid_order_reports_failure() {
        let router = test_router();

        let response = router
            .oneshot(post_json(
                "/order",
                r#"{"side":"buy","price":"100","quantity":"0"}"#,
            ))
            .await
            .expect("handler runs");

        let submit = body_json(response).await;
        assert_eq!(submit["success"], Value::Bool(false));
        assert!(submit["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_gossip_snapshot_request() {
        let router = test_router();

        router
            .clone()
            .oneshot(post_json(
                "/order",
                r#"{"side":"buy","price":"99","quantity":"2"}"#,
            ))
            .await
            .expect("handler runs");

        let response = router
            .oneshot(post_json("/gossip", r#"{"type":"snapshot_request"}"#))
            .await
            .expect("handler runs");
        let snapshot = body_json(response).await;
        assert_eq!(snapshot["pair"], "BTC-USD");
        assert_eq!(snapshot["bids"].as_array().map(|b| b.len()), Some(1));
    }

    #[tokio::test]
    async fn test_gossip_unknown_payload_is_null() {
        let router = test_router();

        let response = router
            .oneshot(post_json("/gossip", r#"{"type":"peer_ping"}"#))
            .await
            .expect("handler runs");
        assert_eq!(body_json(response).await, Value::Null);
    }

    #[tokio::test]
    async fn test_gossip_remote_order_is_applied() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(post_json(
                "/gossip",
                r#"{"type":"new_order","order":{"id":"r1","side":"sell","price":"101","quantity":"1","peer_id":"peer-remote"}}"#,
            ))
            .await
            .expect("handler runs");
        let applied = body_json(response).await;
        assert_eq!(applied["status"], "open");

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/state")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");
        let state = body_json(response).await;
        assert_eq!(state["asks"][0]["id"], "r1");
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");
        assert_eq!(body_json(response).await["status"], "ok");

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");
        let metrics = body_json(response).await;
        assert!(metrics["orders_received"].is_u64());
    }
}
