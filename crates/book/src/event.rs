//! Observable events and hook table for the order book
//!
//! The book notifies observers through a fixed set of hooks, invoked
//! synchronously on the caller's context in a specified order: trades
//! first (after they are visible in the trade log), removals of consumed
//! makers next, the resting remainder last. A hook must not call back into
//! the book; anything slow belongs on a channel the hook only pushes to.

use serde::Serialize;

use crate::domain::{Order, Trade};

/// Event emitted by the book after a state change
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookEvent {
    /// A trade was executed
    Trade { trade: Trade },
    /// An order came to rest in the book
    OrderAdded { order: Order },
    /// A resting order left the book (filled or cancelled)
    OrderRemoved { order: Order },
}

impl BookEvent {
    /// Short discriminant, used as the SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            BookEvent::Trade { .. } => "trade",
            BookEvent::OrderAdded { .. } => "order_added",
            BookEvent::OrderRemoved { .. } => "order_removed",
        }
    }
}

/// Hook invoked for each executed trade
pub type TradeHook = Box<dyn FnMut(&Trade) + Send + Sync>;
/// Hook invoked when an order rests or leaves the book
pub type OrderHook = Box<dyn FnMut(&Order) + Send + Sync>;

/// Fixed-arity table of optional observer callbacks
#[derive(Default)]
pub struct BookHooks {
    pub(crate) on_trade: Option<TradeHook>,
    pub(crate) on_order_added: Option<OrderHook>,
    pub(crate) on_order_removed: Option<OrderHook>,
}

impl BookHooks {
    pub(crate) fn emit_trade(&mut self, trade: &Trade) {
        if let Some(hook) = self.on_trade.as_mut() {
            hook(trade);
        }
    }

    pub(crate) fn emit_order_added(&mut self, order: &Order) {
        if let Some(hook) = self.on_order_added.as_mut() {
            hook(order);
        }
    }

    pub(crate) fn emit_order_removed(&mut self, order: &Order) {
        if let Some(hook) = self.on_order_removed.as_mut() {
            hook(order);
        }
    }
}
