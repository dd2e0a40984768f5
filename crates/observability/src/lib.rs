//! Observability infrastructure for MeshBook
//!
//! Structured logging via `tracing`. The log level is controlled with the
//! `RUST_LOG` environment variable; the output format is chosen at startup.

pub mod logging;

pub use logging::{init_logging, LogFormat};
