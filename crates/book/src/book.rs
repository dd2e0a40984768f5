//! Order book and matching state machine
//!
//! This module implements the deterministic price-time priority matching
//! algorithm over the two priority heaps.
//!
//! CRITICAL PROPERTIES:
//! 1. Strict price-time priority (earliest order at the best price first)
//! 2. Trades always execute at the resting order's price
//! 3. The book is never crossed after a public operation returns
//! 4. Trades are appended to the log before any hook observes them

use common::{OrderStatus, OrderType, Side};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::{now_millis, round_to, Order, Trade};
use crate::error::{BookError, BookResult};
use crate::event::BookHooks;
use crate::heap::OrderHeap;
use crate::result::MatchResult;
use crate::snapshot::BookSnapshot;

/// Configuration for a single-pair order book
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Pair symbol this book trades (e.g., "BTC-USD")
    pub pair: String,
    /// Decimal places applied to every price write
    pub price_precision: u32,
    /// Decimal places applied to every quantity write
    pub quantity_precision: u32,
}

impl BookConfig {
    /// Config with the default precisions (2 price decimals, 8 quantity)
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            price_precision: 2,
            quantity_precision: 8,
        }
    }

    /// Override both precisions
    pub fn with_precisions(mut self, price: u32, quantity: u32) -> Self {
        self.price_precision = price;
        self.quantity_precision = quantity;
        self
    }
}

/// One fill produced by the matching loop: the trade plus the maker it
/// fully consumed, if any.
struct Fill {
    trade: Trade,
    consumed_maker: Option<Order>,
}

/// Limit order book for a single trading pair
///
/// The book is single-threaded cooperative: all operations are synchronous
/// and run to completion on the owning context. Heaps, trade log, and hook
/// table are private; observers see the book only through queries,
/// snapshots, and hooks.
pub struct OrderBook {
    pair: String,
    price_precision: u32,
    quantity_precision: u32,
    bids: OrderHeap,
    asks: OrderHeap,
    trades: Vec<Trade>,
    hooks: BookHooks,
    sequence: u64,
}

impl OrderBook {
    /// Create an empty book for the configured pair
    pub fn new(config: BookConfig) -> Self {
        Self {
            pair: config.pair,
            price_precision: config.price_precision,
            quantity_precision: config.quantity_precision,
            bids: OrderHeap::bids(),
            asks: OrderHeap::asks(),
            trades: Vec::new(),
            hooks: BookHooks::default(),
            sequence: 0,
        }
    }

    /// Pair symbol this book trades
    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// Decimal places applied to prices
    pub fn price_precision(&self) -> u32 {
        self.price_precision
    }

    /// Decimal places applied to quantities
    pub fn quantity_precision(&self) -> u32 {
        self.quantity_precision
    }

    /// Register the trade hook
    pub fn set_on_trade(&mut self, hook: impl FnMut(&Trade) + Send + Sync + 'static) {
        self.hooks.on_trade = Some(Box::new(hook));
    }

    /// Register the order-added hook
    pub fn set_on_order_added(&mut self, hook: impl FnMut(&Order) + Send + Sync + 'static) {
        self.hooks.on_order_added = Some(Box::new(hook));
    }

    /// Register the order-removed hook
    pub fn set_on_order_removed(&mut self, hook: impl FnMut(&Order) + Send + Sync + 'static) {
        self.hooks.on_order_removed = Some(Box::new(hook));
    }

    /// Submit an order to the book
    ///
    /// Validates and normalizes the order, runs the matching loop against
    /// the opposing heap, rests any limit remainder, and notifies hooks.
    /// Market remainders are discarded; they never rest.
    pub fn add_order(&mut self, order: Order) -> BookResult<MatchResult> {
        self.validate(&order)?;
        let mut order = self.normalize(order)?;

        info!(
            order_id = %order.id,
            side = %order.side,
            order_type = %order.order_type,
            price = ?order.price,
            quantity = %order.quantity,
            "Matching order"
        );

        let fills = self.match_incoming(&mut order);

        // Trades become visible to readers of the log before any hook runs,
        // so a hook that queries get_trades() sees the trade it was told
        // about.
        for fill in &fills {
            self.trades.push(fill.trade.clone());
        }
        for fill in &fills {
            self.hooks.emit_trade(&fill.trade);
            if let Some(maker) = &fill.consumed_maker {
                self.hooks.emit_order_removed(maker);
            }
        }

        let trades: Vec<Trade> = fills.into_iter().map(|f| f.trade).collect();

        if order.is_filled() {
            return Ok(MatchResult::filled(trades));
        }

        match order.order_type {
            OrderType::Limit => {
                let resting = order.clone();
                match resting.side {
                    Side::Buy => self.bids.insert(resting.clone()),
                    Side::Sell => self.asks.insert(resting.clone()),
                }
                self.hooks.emit_order_added(&resting);
                if trades.is_empty() {
                    Ok(MatchResult::open(resting))
                } else {
                    Ok(MatchResult::partial(trades, resting))
                }
            }
            OrderType::Market => {
                debug!(
                    order_id = %order.id,
                    leftover = %order.quantity,
                    "Market remainder discarded"
                );
                if trades.is_empty() {
                    Ok(MatchResult::open(order))
                } else {
                    Ok(MatchResult::partial(trades, order))
                }
            }
        }
    }

    /// Apply an order received from another replica
    ///
    /// Same contract as [`add_order`](Self::add_order); matching happens
    /// independently on every replica. Loopback suppression is the replica
    /// adapter's job, not the book's.
    pub fn apply_remote_order(&mut self, order: Order) -> BookResult<MatchResult> {
        debug!(order_id = %order.id, peer_id = ?order.peer_id, "Applying remote order");
        self.add_order(order)
    }

    /// Cancel a resting order by id
    ///
    /// Searches bids first, then asks. Cancelling an unknown id is a miss,
    /// not an error.
    pub fn cancel_order(&mut self, id: &str) -> Option<Order> {
        let removed = self
            .bids
            .remove_by_id(id)
            .or_else(|| self.asks.remove_by_id(id));

        let mut order = removed?;
        order.status = OrderStatus::Cancelled;
        info!(order_id = %order.id, "Order cancelled");
        self.hooks.emit_order_removed(&order);
        Some(order)
    }

    /// Copy of the highest-priority bid
    pub fn best_bid(&self) -> Option<Order> {
        self.bids.peek().cloned()
    }

    /// Copy of the highest-priority ask
    pub fn best_ask(&self) -> Option<Order> {
        self.asks.peek().cloned()
    }

    /// Best ask price minus best bid price, rounded at price precision
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.bids.peek().and_then(|o| o.price)?;
        let ask = self.asks.peek().and_then(|o| o.price)?;
        Some(round_to(ask - bid, self.price_precision))
    }

    /// Copies of resting bids, highest priority first
    pub fn get_bids(&self) -> Vec<Order> {
        self.bids.to_sorted_vec()
    }

    /// Copies of resting asks, highest priority first
    pub fn get_asks(&self) -> Vec<Order> {
        self.asks.to_sorted_vec()
    }

    /// Copy of the full trade log, oldest first
    pub fn get_trades(&self) -> Vec<Trade> {
        self.trades.clone()
    }

    /// Copy of the most recent `limit` trades, oldest first
    pub fn recent_trades(&self, limit: usize) -> Vec<Trade> {
        let start = self.trades.len().saturating_sub(limit);
        self.trades[start..].to_vec()
    }

    /// Total number of resting orders on both sides
    pub fn depth(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Deep-copy snapshot of the resting state
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            pair: self.pair.clone(),
            timestamp: now_millis(),
            bids: self.bids.to_vec(),
            asks: self.asks.to_vec(),
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            spread: self.spread(),
        }
    }

    /// Replace the resting state with a snapshot from another replica
    ///
    /// The snapshot arrays are treated as an unordered multiset; heap
    /// order is re-established by insertion. The trade log is untouched.
    pub fn load_snapshot(&mut self, snapshot: BookSnapshot) -> BookResult<()> {
        if snapshot.pair != self.pair {
            return Err(BookError::PairMismatch {
                expected: self.pair.clone(),
                actual: snapshot.pair,
            });
        }

        let mut bids = OrderHeap::bids();
        let mut asks = OrderHeap::asks();
        for order in snapshot.bids {
            bids.insert(order);
        }
        for order in snapshot.asks {
            asks.insert(order);
        }

        info!(
            pair = %self.pair,
            bids = bids.len(),
            asks = asks.len(),
            "Book rebuilt from snapshot"
        );
        self.bids = bids;
        self.asks = asks;
        Ok(())
    }

    fn validate(&self, order: &Order) -> BookResult<()> {
        if order.id.trim().is_empty() {
            return Err(BookError::InvalidOrder("order id must not be empty".into()));
        }
        if order.quantity <= Decimal::ZERO {
            return Err(BookError::InvalidOrder(format!(
                "quantity must be positive, got {}",
                order.quantity
            )));
        }
        if order.order_type == OrderType::Limit {
            match order.price {
                None => {
                    return Err(BookError::InvalidOrder(
                        "limit order requires a price".into(),
                    ));
                }
                Some(price) if price <= Decimal::ZERO => {
                    return Err(BookError::InvalidOrder(format!(
                        "price must be positive, got {price}"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn normalize(&self, mut order: Order) -> BookResult<Order> {
        order.status = OrderStatus::Open;
        order.quantity = round_to(order.quantity, self.quantity_precision);
        order.price = match order.order_type {
            OrderType::Market => None,
            OrderType::Limit => order.price.map(|p| round_to(p, self.price_precision)),
        };

        // Rounding can collapse sub-precision values to zero.
        if order.quantity <= Decimal::ZERO {
            return Err(BookError::InvalidOrder(
                "quantity rounds to zero at book precision".into(),
            ));
        }
        if order.order_type == OrderType::Limit
            && order.price.map_or(true, |p| p <= Decimal::ZERO)
        {
            return Err(BookError::InvalidOrder(
                "price rounds to zero at book precision".into(),
            ));
        }
        Ok(order)
    }

    /// Match the aggressor against the opposing heap, consuming makers in
    /// price-time order while the cross condition holds.
    fn match_incoming(&mut self, order: &mut Order) -> Vec<Fill> {
        let mut fills = Vec::new();

        loop {
            if order.quantity <= Decimal::ZERO {
                break;
            }

            let (maker_id, maker_price, maker_qty, maker_peer) = {
                let opposing = match order.side {
                    Side::Buy => &self.asks,
                    Side::Sell => &self.bids,
                };
                let Some(best) = opposing.peek() else { break };
                let Some(price) = best.price else {
                    // Market orders never rest; an unpriced entry would be
                    // a broken invariant, not a matchable maker.
                    warn!(order_id = %best.id, "Unpriced resting order skipped");
                    break;
                };
                (best.id.clone(), price, best.quantity, best.peer_id.clone())
            };

            if !crosses(order, maker_price) {
                break;
            }

            let traded = round_to(
                order.quantity.min(maker_qty),
                self.quantity_precision,
            );
            if traded <= Decimal::ZERO {
                // Dust below quantity precision cannot trade.
                break;
            }

            let trade = self.build_trade(order, &maker_id, &maker_peer, maker_price, traded);
            debug!(
                trade_id = %trade.id,
                price = %trade.price,
                quantity = %trade.quantity,
                "Trade executed"
            );

            order.fill(traded, self.quantity_precision);
            let maker_remaining = round_to(maker_qty - traded, self.quantity_precision);

            let consumed_maker = {
                let opposing = match order.side {
                    Side::Buy => &mut self.asks,
                    Side::Sell => &mut self.bids,
                };
                if maker_remaining <= Decimal::ZERO {
                    opposing.extract_top().map(|mut maker| {
                        maker.quantity = Decimal::ZERO;
                        maker.status = OrderStatus::Filled;
                        maker
                    })
                } else {
                    // In-place mutation is safe: heap order depends only on
                    // price and timestamp.
                    opposing.update_quantity(&maker_id, maker_remaining);
                    None
                }
            };

            fills.push(Fill {
                trade,
                consumed_maker,
            });
        }

        fills
    }

    fn build_trade(
        &mut self,
        taker: &Order,
        maker_id: &str,
        maker_peer: &Option<String>,
        price: Decimal,
        quantity: Decimal,
    ) -> Trade {
        let sequence = self.next_sequence();
        let (buy_order_id, sell_order_id, buy_peer_id, sell_peer_id) = match taker.side {
            Side::Buy => (
                taker.id.clone(),
                maker_id.to_string(),
                taker.peer_id.clone(),
                maker_peer.clone(),
            ),
            Side::Sell => (
                maker_id.to_string(),
                taker.id.clone(),
                maker_peer.clone(),
                taker.peer_id.clone(),
            ),
        };

        Trade {
            id: format!("{}_{}_{}", taker.id, maker_id, sequence),
            pair: self.pair.clone(),
            price,
            quantity,
            buy_order_id,
            sell_order_id,
            buy_peer_id,
            sell_peer_id,
            timestamp: now_millis(),
        }
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Cross check: can the aggressor trade against a maker at this price?
fn crosses(order: &Order, maker_price: Decimal) -> bool {
    match order.order_type {
        OrderType::Market => true,
        OrderType::Limit => match order.side {
            Side::Buy => order.price.is_some_and(|p| p >= maker_price),
            Side::Sell => order.price.is_some_and(|p| p <= maker_price),
        },
    }
}
