//! In-process transport for tests and demos

use async_trait::async_trait;
use book::BookSnapshot;
use parking_lot::Mutex;

use crate::payload::GossipPayload;
use crate::transport::{PeerDelivery, Transport, TransportError};

/// Recording transport: captures every broadcast payload for inspection
/// and serves a canned snapshot. Optionally fails every delivery, for
/// exercising the swallow-and-log path.
#[derive(Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<GossipPayload>>,
    snapshot: Mutex<Option<BookSnapshot>>,
    fail_broadcasts: bool,
}

impl MemoryTransport {
    /// Transport that accepts and records everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every broadcast fails
    pub fn failing() -> Self {
        Self {
            fail_broadcasts: true,
            ..Self::default()
        }
    }

    /// Payloads broadcast so far, in order
    pub fn sent(&self) -> Vec<GossipPayload> {
        self.sent.lock().clone()
    }

    /// Set the snapshot served to `request_snapshot`
    pub fn serve_snapshot(&self, snapshot: BookSnapshot) {
        *self.snapshot.lock() = Some(snapshot);
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn broadcast(
        &self,
        payload: &GossipPayload,
    ) -> Result<Vec<PeerDelivery>, TransportError> {
        if self.fail_broadcasts {
            return Err(TransportError::Failed("injected failure".into()));
        }
        self.sent.lock().push(payload.clone());
        Ok(vec![PeerDelivery::delivered("memory")])
    }

    async fn request_snapshot(&self) -> Result<Option<BookSnapshot>, TransportError> {
        Ok(self.snapshot.lock().clone())
    }
}
