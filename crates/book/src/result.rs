//! Result types for book operations

use common::OrderStatus;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Order, Trade};

/// Outcome of submitting one order to the book
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// Trades generated by this submission, in execution order
    pub trades: Vec<Trade>,
    /// The aggressor's leftover, present whenever quantity remains.
    /// A limit leftover is resting in the book; a market leftover was
    /// discarded.
    pub remainder: Option<Order>,
    /// Final status of the aggressor
    pub status: OrderStatus,
}

impl MatchResult {
    /// The aggressor was completely filled
    pub fn filled(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            remainder: None,
            status: OrderStatus::Filled,
        }
    }

    /// The aggressor traded but retains quantity
    pub fn partial(trades: Vec<Trade>, remainder: Order) -> Self {
        Self {
            trades,
            remainder: Some(remainder),
            status: OrderStatus::PartiallyFilled,
        }
    }

    /// The aggressor did not trade at all
    pub fn open(remainder: Order) -> Self {
        Self {
            trades: Vec::new(),
            remainder: Some(remainder),
            status: OrderStatus::Open,
        }
    }

    /// Check if any trades were generated
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }

    /// Total quantity filled across all trades
    pub fn filled_quantity(&self) -> Decimal {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}
