//! Domain types for the order book
//!
//! This module defines the order and trade records shared by the matching
//! core and the replica layer. All prices and quantities are fixed-point
//! decimals; every arithmetic result is rounded back to the book's
//! configured precision so that zero-quantity checks stay exact.

use chrono::Utc;
use common::{OrderStatus, OrderType, Side};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a value to `dp` decimal places, half away from zero.
///
/// Every price/quantity write in the book goes through this helper.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// An order submitted to the book
///
/// The book owns resting orders exclusively; `quantity` is mutated in place
/// as fills accrue and `status` tracks the lifecycle. Market orders carry
/// `price: None` and never rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Globally unique identifier (opaque)
    pub id: String,
    /// Buy or sell
    pub side: Side,
    /// Limit or market
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    /// Limit price; absent for market orders
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Remaining quantity to fill
    pub quantity: Decimal,
    /// Identifier of the originating replica; never interpreted by matching
    #[serde(default)]
    pub peer_id: Option<String>,
    /// Price-time priority tiebreaker, milliseconds since epoch
    #[serde(default = "now_millis")]
    pub timestamp: i64,
    /// Lifecycle status
    #[serde(default = "default_status")]
    pub status: OrderStatus,
}

fn default_status() -> OrderStatus {
    OrderStatus::Open
}

impl Order {
    /// Create a limit order stamped with the current wall-clock
    pub fn limit(id: impl Into<String>, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            peer_id: None,
            timestamp: now_millis(),
            status: OrderStatus::Open,
        }
    }

    /// Create a market order stamped with the current wall-clock
    pub fn market(id: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Market,
            price: None,
            quantity,
            peer_id: None,
            timestamp: now_millis(),
            status: OrderStatus::Open,
        }
    }

    /// Override the priority timestamp
    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.timestamp = millis;
        self
    }

    /// Tag the order with an originating peer
    pub fn with_peer(mut self, peer_id: impl Into<String>) -> Self {
        self.peer_id = Some(peer_id.into());
        self
    }

    /// Reduce quantity after a fill, re-rounding at the book's precision
    pub fn fill(&mut self, qty: Decimal, quantity_precision: u32) {
        self.quantity = round_to(self.quantity - qty, quantity_precision);
        self.status = if self.quantity <= Decimal::ZERO {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Check if the order has no remaining quantity
    pub fn is_filled(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }
}

/// A matched execution between two orders
///
/// Immutable once created. `price` is always the resting order's price,
/// which gives the aggressor price improvement when the quotes differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier
    pub id: String,
    /// Pair the trade executed on
    pub pair: String,
    /// Execution price (the resting order's price)
    pub price: Decimal,
    /// Quantity exchanged
    pub quantity: Decimal,
    /// Buy-side order id
    pub buy_order_id: String,
    /// Sell-side order id
    pub sell_order_id: String,
    /// Replica that originated the buy side
    pub buy_peer_id: Option<String>,
    /// Replica that originated the sell side
    pub sell_peer_id: Option<String>,
    /// When the trade occurred, milliseconds since epoch
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(dec!(1.005), 2), dec!(1.01));
        assert_eq!(round_to(dec!(-1.005), 2), dec!(-1.01));
        assert_eq!(round_to(dec!(1.004), 2), dec!(1.00));
        assert_eq!(round_to(dec!(2.5), 0), dec!(3));
    }

    #[test]
    fn test_order_fill_transitions() {
        let mut order = Order::limit("o1", Side::Buy, dec!(100), dec!(10));
        assert!(!order.is_filled());

        order.fill(dec!(4), 8);
        assert_eq!(order.quantity, dec!(6));
        assert_eq!(order.status, OrderStatus::PartiallyFilled);

        order.fill(dec!(6), 8);
        assert!(order.is_filled());
        assert_eq!(order.status, OrderStatus::Filled);
    }

    #[test]
    fn test_market_order_has_no_price() {
        let order = Order::market("m1", Side::Sell, dec!(2.5));
        assert_eq!(order.price, None);
        assert_eq!(order.order_type, OrderType::Market);
    }

    #[test]
    fn test_order_deserializes_with_defaults() {
        let order: Order =
            serde_json::from_str(r#"{"id":"o1","side":"buy","price":"100","quantity":"1"}"#)
                .expect("valid order json");
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.status, OrderStatus::Open);
        assert!(order.timestamp > 0);
    }
}
