//! Replica layer for MeshBook
//!
//! Wraps the order book with origin tracking and the broadcast port:
//! locally submitted orders are applied and then gossiped, inbound orders
//! are applied unless they originated here, and snapshot requests are
//! served so that late joiners can catch up.
//!
//! The transport itself is a port — see [`Transport`] — implemented over
//! HTTP in the server crate and in-process by [`MemoryTransport`].

pub mod memory;
pub mod node;
pub mod payload;
pub mod transport;

pub use memory::MemoryTransport;
pub use node::{ReplicaNode, RequestOutcome};
pub use payload::GossipPayload;
pub use transport::{NullTransport, PeerDelivery, Transport, TransportError};
