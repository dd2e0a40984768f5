//! HTTP API: REST handlers, SSE stream, and routing

pub mod handlers;
pub mod routes;
pub mod sse;

pub use handlers::{build_state, AppState};
pub use routes::create_router;
pub use sse::wire_book_events;
