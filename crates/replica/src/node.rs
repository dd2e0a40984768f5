//! Replica node: the adapter between the local book and the mesh
//!
//! The node classifies orders as locally originated or remote. Local
//! submissions are applied to the book first and then broadcast; inbound
//! payloads are applied idempotently with respect to origin (a replica
//! drops its own orders coming back around). Matching happens
//! independently on every replica; no global order of operations exists,
//! and under concurrent crossing submissions trade histories may diverge.
//! That is accepted: broadcast is best-effort and nothing is rolled back.

use std::sync::Arc;
use std::time::Instant;

use book::{BookMetrics, BookResult, BookSnapshot, MatchResult, Order, OrderBook, Trade};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::payload::GossipPayload;
use crate::transport::{Transport, TransportError};

/// Response produced for an inbound gossip payload
#[derive(Debug)]
pub enum RequestOutcome {
    /// A remote order was applied to the local book
    Applied(MatchResult),
    /// The peer asked for, and gets, a snapshot
    Snapshot(BookSnapshot),
}

/// One replica of the distributed book
pub struct ReplicaNode {
    peer_id: String,
    book: OrderBook,
    transport: Arc<dyn Transport>,
    metrics: Arc<BookMetrics>,
}

impl ReplicaNode {
    /// Create a replica around an existing book
    pub fn new(peer_id: impl Into<String>, book: OrderBook, transport: Arc<dyn Transport>) -> Self {
        Self {
            peer_id: peer_id.into(),
            book,
            transport,
            metrics: Arc::new(BookMetrics::new()),
        }
    }

    /// This replica's identifier on the mesh
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    /// Read access to the underlying book
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Shared handle to the node's meters
    pub fn metrics(&self) -> Arc<BookMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Submit a locally originated order
    ///
    /// Assigns a fresh id when the submitter did not provide one, stamps
    /// this replica as the origin, applies the order to the local book,
    /// and then hands the pre-matching payload to the transport. Broadcast
    /// failure is logged and swallowed; the local application stands.
    pub async fn submit_order(&mut self, mut order: Order) -> BookResult<MatchResult> {
        if order.id.trim().is_empty() {
            order.id = Uuid::new_v4().to_string();
        }
        order.peer_id = Some(self.peer_id.clone());

        // Peers receive the order as submitted, not the matched residue.
        let outbound = order.clone();

        let started = Instant::now();
        self.metrics.record_order_received();
        let result = match self.book.add_order(order) {
            Ok(result) => result,
            Err(err) => {
                self.metrics.record_order_rejected();
                return Err(err);
            }
        };
        self.metrics.record_latency(started.elapsed());
        self.record_match(&result);

        self.broadcast(GossipPayload::NewOrder { order: outbound })
            .await;
        Ok(result)
    }

    /// Cancel a resting order on this replica
    pub fn cancel_order(&mut self, id: &str) -> Option<Order> {
        let cancelled = self.book.cancel_order(id);
        if cancelled.is_some() {
            self.metrics.set_resting_depth(self.book.depth() as u64);
        }
        cancelled
    }

    /// Handle a payload delivered by the transport
    ///
    /// Loopback orders are dropped, remote orders are applied, snapshot
    /// requests are answered, and unknown payloads are ignored. Errors
    /// never travel back across the transport: a remote order that fails
    /// validation is logged and dropped.
    pub fn on_request(&mut self, payload: GossipPayload) -> Option<RequestOutcome> {
        match payload {
            GossipPayload::NewOrder { order } => {
                if order.peer_id.as_deref() == Some(self.peer_id.as_str()) {
                    debug!(order_id = %order.id, "Loopback order dropped");
                    return None;
                }

                self.metrics.record_order_received();
                match self.book.apply_remote_order(order) {
                    Ok(result) => {
                        self.record_match(&result);
                        Some(RequestOutcome::Applied(result))
                    }
                    Err(err) => {
                        warn!(%err, "Remote order rejected");
                        self.metrics.record_order_rejected();
                        None
                    }
                }
            }
            GossipPayload::SnapshotRequest => {
                Some(RequestOutcome::Snapshot(self.book.snapshot()))
            }
            GossipPayload::Unknown => None,
        }
    }

    /// Pull a snapshot from the mesh and rebuild the local book from it
    ///
    /// Used at startup to onboard against peers that are already trading.
    /// Returns `Ok(false)` when nobody could serve a snapshot; a snapshot
    /// for a foreign pair is an error and leaves the book untouched.
    pub async fn sync_with_peers(&mut self) -> BookResult<bool> {
        match self.transport.request_snapshot().await {
            Ok(Some(snapshot)) => {
                self.book.load_snapshot(snapshot)?;
                self.metrics.set_resting_depth(self.book.depth() as u64);
                info!(peer_id = %self.peer_id, "Synchronized from peer snapshot");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(TransportError::NoPeers) => {
                debug!("No peers available for snapshot sync");
                Ok(false)
            }
            Err(err) => {
                warn!(%err, "Snapshot sync failed");
                Ok(false)
            }
        }
    }

    /// Deep-copy snapshot of the local book
    pub fn snapshot(&self) -> BookSnapshot {
        self.book.snapshot()
    }

    /// The most recent `limit` local trades
    pub fn recent_trades(&self, limit: usize) -> Vec<Trade> {
        self.book.recent_trades(limit)
    }

    fn record_match(&self, result: &MatchResult) {
        if result.has_trades() {
            self.metrics.record_order_matched();
            self.metrics.record_trades(result.trades.len() as u64);
        }
        self.metrics.set_resting_depth(self.book.depth() as u64);
    }

    async fn broadcast(&self, payload: GossipPayload) {
        match self.transport.broadcast(&payload).await {
            Ok(deliveries) => {
                let failed = deliveries.iter().filter(|d| !d.ok).count();
                if failed > 0 {
                    warn!(
                        failed,
                        total = deliveries.len(),
                        "Partial broadcast delivery"
                    );
                }
            }
            Err(TransportError::NoPeers) => {
                debug!("No peers found for broadcast");
            }
            Err(err) => {
                warn!(%err, "Broadcast failed; local book unchanged");
            }
        }
    }
}
