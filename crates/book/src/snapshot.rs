//! Serializable book snapshot
//!
//! A snapshot is a self-contained copy of a book's resting state, enough
//! to rebuild an equivalent book on another node. The `bids`/`asks` arrays
//! are an unordered multiset: receivers re-establish heap order by
//! inserting each order individually. Trade history never travels with a
//! snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Order;

/// Snapshot of a book's resting orders and top-of-book summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Pair the snapshot belongs to; enforced on load
    pub pair: String,
    /// When the snapshot was taken, milliseconds since epoch
    pub timestamp: i64,
    /// Resting buy orders, order insignificant
    pub bids: Vec<Order>,
    /// Resting sell orders, order insignificant
    pub asks: Vec<Order>,
    /// Highest-priority bid at snapshot time
    pub best_bid: Option<Order>,
    /// Highest-priority ask at snapshot time
    pub best_ask: Option<Order>,
    /// Best ask price minus best bid price, when both sides are populated
    pub spread: Option<Decimal>,
}
