//! HTTP implementation of the gossip transport port
//!
//! Peers are plain base URLs; a broadcast POSTs the payload to every
//! peer's `/gossip` endpoint concurrently and reports per-peer outcomes.
//! The reqwest client is built once and reused across deliveries.

use async_trait::async_trait;
use book::BookSnapshot;
use futures::future::join_all;
use replica::{GossipPayload, PeerDelivery, Transport, TransportError};
use std::time::Duration;
use tracing::debug;

/// Gossip transport that fans payloads out over HTTP
pub struct HttpGossipTransport {
    client: reqwest::Client,
    peers: Vec<String>,
}

impl HttpGossipTransport {
    /// Create a transport for the given peer base URLs
    pub fn new(peers: Vec<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, peers }
    }

    /// The configured peer base URLs
    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    fn gossip_url(peer: &str) -> String {
        format!("{}/gossip", peer.trim_end_matches('/'))
    }

    async fn deliver(&self, peer: &str, payload: &GossipPayload) -> PeerDelivery {
        let url = Self::gossip_url(peer);
        match self.client.post(&url).json(payload).send().await {
            Ok(response) if response.status().is_success() => PeerDelivery::delivered(peer),
            Ok(response) => {
                PeerDelivery::failed(peer, format!("HTTP {}", response.status()))
            }
            Err(err) => PeerDelivery::failed(peer, err.to_string()),
        }
    }
}

#[async_trait]
impl Transport for HttpGossipTransport {
    async fn broadcast(
        &self,
        payload: &GossipPayload,
    ) -> Result<Vec<PeerDelivery>, TransportError> {
        if self.peers.is_empty() {
            return Err(TransportError::NoPeers);
        }

        let deliveries = join_all(
            self.peers
                .iter()
                .map(|peer| self.deliver(peer, payload)),
        )
        .await;

        Ok(deliveries)
    }

    async fn request_snapshot(&self) -> Result<Option<BookSnapshot>, TransportError> {
        if self.peers.is_empty() {
            return Err(TransportError::NoPeers);
        }

        // First peer that answers with a snapshot wins.
        for peer in &self.peers {
            let url = Self::gossip_url(peer);
            let response = self
                .client
                .post(&url)
                .json(&GossipPayload::SnapshotRequest)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    match response.json::<Option<BookSnapshot>>().await {
                        Ok(Some(snapshot)) => return Ok(Some(snapshot)),
                        Ok(None) => continue,
                        Err(err) => {
                            debug!(peer, %err, "Peer returned an unreadable snapshot");
                        }
                    }
                }
                Ok(response) => {
                    debug!(peer, status = %response.status(), "Snapshot request refused");
                }
                Err(err) => {
                    debug!(peer, %err, "Peer unreachable for snapshot");
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_peer_list_is_no_peers() {
        let transport = HttpGossipTransport::new(Vec::new(), Duration::from_millis(100));

        assert!(matches!(
            transport.broadcast(&GossipPayload::SnapshotRequest).await,
            Err(TransportError::NoPeers)
        ));
        assert!(matches!(
            transport.request_snapshot().await,
            Err(TransportError::NoPeers)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_peer_reports_failed_delivery() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let transport = HttpGossipTransport::new(
            vec!["http://192.0.2.1:1".into()],
            Duration::from_millis(50),
        );

        let deliveries = transport
            .broadcast(&GossipPayload::SnapshotRequest)
            .await
            .expect("per-peer failure is not a transport error");
        assert_eq!(deliveries.len(), 1);
        assert!(!deliveries[0].ok);
        assert!(deliveries[0].error.is_some());
    }
}
