//! Common types for MeshBook
//!
//! This crate provides the shared vocabulary used across all MeshBook
//! crates: order sides, order types, lifecycle statuses, and trading
//! pairs. Errors are domain-specific and live with the crates that raise
//! them.

pub mod types;

pub use types::*;
