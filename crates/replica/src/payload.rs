//! Gossip payloads exchanged between replicas

use book::Order;
use serde::{Deserialize, Serialize};

/// Payload delivered over the gossip substrate
///
/// Unrecognized payload types deserialize to [`Unknown`](Self::Unknown)
/// and are ignored by the replica; a newer peer speaking a richer protocol
/// must not break an older one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GossipPayload {
    /// A freshly accepted order, broadcast by its origin replica
    NewOrder { order: Order },
    /// Ask the receiving replica for its current book snapshot
    SnapshotRequest,
    /// Any payload type this version does not understand
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_round_trip() {
        let json = r#"{"type":"new_order","order":{"id":"o1","side":"buy","price":"100","quantity":"1"}}"#;
        let payload: GossipPayload = serde_json::from_str(json).expect("valid payload");
        match payload {
            GossipPayload::NewOrder { order } => assert_eq!(order.id, "o1"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let payload: GossipPayload =
            serde_json::from_str(r#"{"type":"peer_ping"}"#).expect("parses");
        assert!(matches!(payload, GossipPayload::Unknown));
    }
}
