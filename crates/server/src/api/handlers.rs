//! REST handlers for the node's HTTP surface

use axum::extract::{Path, State};
use axum::Json;
use book::{now_millis, BookEvent, BookMetrics, MetricsSnapshot, Order, Trade};
use chrono::Utc;
use common::{OrderStatus, OrderType, Side};
use replica::{ReplicaNode, RequestOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Shared state behind every handler
///
/// The replica node is single-threaded by design; the async mutex is the
/// "owning context" that serializes all book operations.
#[derive(Clone)]
pub struct AppState {
    pub node: Arc<Mutex<ReplicaNode>>,
    pub events: broadcast::Sender<BookEvent>,
    pub metrics: Arc<BookMetrics>,
}

/// Build the handler state around a replica node
pub fn build_state(node: ReplicaNode, events: broadcast::Sender<BookEvent>) -> AppState {
    let metrics = node.metrics();
    AppState {
        node: Arc::new(Mutex::new(node)),
        events,
        metrics,
    }
}

/// Request body for order submission
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub side: Side,
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub quantity: Decimal,
}

/// Response for order submission
#[derive(Debug, Serialize)]
pub struct SubmitOrderResponse {
    pub success: bool,
    pub order_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub trades: Vec<Trade>,
    pub remainder: Option<Order>,
    pub message: Option<String>,
}

/// Response for order cancellation
#[derive(Debug, Serialize)]
pub struct CancelOrderResponse {
    pub ok: bool,
    pub cancelled: Option<Order>,
}

/// Response for the node state view
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub peer_id: String,
    pub pair: String,
    pub timestamp: i64,
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
    pub best_bid: Option<Order>,
    pub best_ask: Option<Order>,
    pub spread: Option<Decimal>,
    pub trades: Vec<Trade>,
}

/// Submit a locally originated order
pub async fn submit_order(
    State(state): State<AppState>,
    Json(req): Json<SubmitOrderRequest>,
) -> Json<SubmitOrderResponse> {
    let order = Order {
        id: Uuid::new_v4().to_string(),
        side: req.side,
        order_type: req.order_type,
        price: req.price,
        quantity: req.quantity,
        peer_id: None,
        timestamp: now_millis(),
        status: OrderStatus::Open,
    };
    let order_id = order.id.clone();

    let mut node = state.node.lock().await;
    match node.submit_order(order).await {
        Ok(result) => Json(SubmitOrderResponse {
            success: true,
            order_id: Some(order_id),
            status: Some(result.status),
            trades: result.trades,
            remainder: result.remainder,
            message: None,
        }),
        Err(err) => Json(SubmitOrderResponse {
            success: false,
            order_id: None,
            status: None,
            trades: Vec::new(),
            remainder: None,
            message: Some(err.to_string()),
        }),
    }
}

/// Cancel a resting order
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CancelOrderResponse> {
    let mut node = state.node.lock().await;
    let cancelled = node.cancel_order(&id);
    Json(CancelOrderResponse {
        ok: cancelled.is_some(),
        cancelled,
    })
}

/// Current book state plus the most recent trades
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let node = state.node.lock().await;
    let book = node.book();

    Json(StateResponse {
        peer_id: node.peer_id().to_string(),
        pair: book.pair().to_string(),
        timestamp: now_millis(),
        bids: book.get_bids(),
        asks: book.get_asks(),
        best_bid: book.best_bid(),
        best_ask: book.best_ask(),
        spread: book.spread(),
        trades: node.recent_trades(20),
    })
}

/// Inbound gossip endpoint: the transport port's receive side
///
/// Undecodable and unknown payloads are ignored with a null response;
/// errors never travel back to peers.
pub async fn gossip(
    State(state): State<AppState>,
    Json(value): Json<Value>,
) -> Json<Value> {
    let payload = match serde_json::from_value(value) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(%err, "Undecodable gossip payload ignored");
            return Json(Value::Null);
        }
    };

    let mut node = state.node.lock().await;
    let response = match node.on_request(payload) {
        Some(RequestOutcome::Applied(result)) => {
            serde_json::to_value(result).unwrap_or(Value::Null)
        }
        Some(RequestOutcome::Snapshot(snapshot)) => {
            serde_json::to_value(snapshot).unwrap_or(Value::Null)
        }
        None => Value::Null,
    };
    Json(response)
}

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "meshbook",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Current meter readings
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
