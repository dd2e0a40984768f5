//! Transport port for the gossip substrate
//!
//! The replica never talks to the network directly; it hands payloads to
//! an injected [`Transport`]. Implementations decide how peers are found
//! and how payloads travel (the server crate ships an HTTP fan-out,
//! [`MemoryTransport`](crate::MemoryTransport) covers tests).

use async_trait::async_trait;
use book::BookSnapshot;
use serde::Serialize;
use thiserror::Error;

use crate::payload::GossipPayload;

/// Errors surfaced by a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The lookup found nobody to deliver to. A quiet mesh, not a fault.
    #[error("No peers found")]
    NoPeers,

    /// The transport could not deliver at all
    #[error("Broadcast failed: {0}")]
    Failed(String),
}

/// Outcome of delivering one payload to one peer
#[derive(Debug, Clone, Serialize)]
pub struct PeerDelivery {
    /// Peer identifier or address
    pub peer: String,
    /// Whether the peer acknowledged the payload
    pub ok: bool,
    /// Delivery error, when `ok` is false
    pub error: Option<String>,
}

impl PeerDelivery {
    /// Successful delivery to a peer
    pub fn delivered(peer: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            ok: true,
            error: None,
        }
    }

    /// Failed delivery to a peer
    pub fn failed(peer: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Broadcast/receive port into the peer-to-peer substrate
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fan a payload out to every currently known peer.
    ///
    /// Partial failure is reported per peer, not as an error; `NoPeers`
    /// is the distinguished empty-mesh condition.
    async fn broadcast(
        &self,
        payload: &GossipPayload,
    ) -> Result<Vec<PeerDelivery>, TransportError>;

    /// Ask any reachable peer for its current book snapshot.
    ///
    /// Returns `Ok(None)` when no peer can serve one.
    async fn request_snapshot(&self) -> Result<Option<BookSnapshot>, TransportError>;
}

/// Transport for a node running without a mesh
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn broadcast(
        &self,
        _payload: &GossipPayload,
    ) -> Result<Vec<PeerDelivery>, TransportError> {
        Err(TransportError::NoPeers)
    }

    async fn request_snapshot(&self) -> Result<Option<BookSnapshot>, TransportError> {
        Ok(None)
    }
}
