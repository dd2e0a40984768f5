//! Limit order book core for MeshBook
//!
//! This crate implements the matching side of a peer-to-peer order book
//! replica: the priority heaps, the price-time priority matching state
//! machine, the observable event surface, and the snapshot format used to
//! onboard or resynchronize peers.
//!
//! # Features
//!
//! - Price-time priority matching (earliest order at the best price first)
//! - Limit and market orders; market remainders never rest
//! - Fixed-point decimal arithmetic with per-write precision rounding
//! - Synchronous observer hooks with a specified firing order
//! - Deep-copy snapshots rebuilt by insertion on the receiving side
//!
//! # Architecture
//!
//! The book is single-threaded cooperative: one logical context owns it,
//! every public operation runs to completion, and hooks are invoked on the
//! caller's context. Anything asynchronous (gossip, SSE push) lives in the
//! replica and server crates and only ever talks to the book through its
//! public operations.
//!
//! # Example
//!
//! ```
//! use book::{BookConfig, Order, OrderBook};
//! use common::Side;
//! use rust_decimal::Decimal;
//!
//! let mut book = OrderBook::new(BookConfig::new("BTC-USD"));
//! book.add_order(Order::limit("s1", Side::Sell, Decimal::from(100), Decimal::ONE))
//!     .unwrap();
//! let result = book
//!     .add_order(Order::limit("b1", Side::Buy, Decimal::from(100), Decimal::ONE))
//!     .unwrap();
//! assert_eq!(result.trades.len(), 1);
//! ```

pub mod book;
pub mod domain;
pub mod error;
pub mod event;
pub mod heap;
pub mod metrics;
pub mod result;
pub mod snapshot;

pub use book::{BookConfig, OrderBook};
pub use domain::{now_millis, round_to, Order, Trade};
pub use error::{BookError, BookResult};
pub use event::{BookEvent, BookHooks};
pub use heap::OrderHeap;
pub use metrics::{BookMetrics, MetricsSnapshot};
pub use result::MatchResult;
pub use snapshot::BookSnapshot;
