//! HTTP surface for a MeshBook node
//!
//! This crate owns everything network-facing on a node:
//!
//! - the REST + SSE API a UI talks to ([`api`])
//! - the inbound gossip endpoint and the outbound HTTP gossip transport
//!   ([`transport`])
//! - server lifecycle with graceful shutdown ([`http`], [`shutdown`])
//!
//! The matching core never blocks on any of this: handlers take the
//! node's async mutex, hooks only push onto a broadcast channel, and
//! gossip fan-out happens after local application completes.

pub mod api;
pub mod error;
pub mod http;
pub mod shutdown;
pub mod transport;

pub use api::{build_state, create_router, wire_book_events, AppState};
pub use error::{Result, ServerError};
pub use http::{HttpServer, ServerConfig};
pub use shutdown::ShutdownController;
pub use transport::HttpGossipTransport;
