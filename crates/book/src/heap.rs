//! Priority heap for resting orders
//!
//! A binary heap over a comparator function. `std::collections::BinaryHeap`
//! cannot express the book's removal and in-place mutation operations, so
//! the sift routines are explicit here. Two instantiations exist: the bid
//! heap (price descending) and the ask heap (price ascending), both with
//! earliest-timestamp tiebreak, which is what realizes price-time priority.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::domain::Order;

/// Ordering relation between two orders. `Less` means higher priority.
type Comparator = fn(&Order, &Order) -> Ordering;

fn price_of(order: &Order) -> Decimal {
    // Only limit orders rest, so a missing price never participates in
    // a comparison; zero keeps the function total.
    order.price.unwrap_or(Decimal::ZERO)
}

fn bid_priority(a: &Order, b: &Order) -> Ordering {
    price_of(b)
        .cmp(&price_of(a))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

fn ask_priority(a: &Order, b: &Order) -> Ordering {
    price_of(a)
        .cmp(&price_of(b))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Binary heap of resting orders with identifier-based access
pub struct OrderHeap {
    items: Vec<Order>,
    cmp: Comparator,
}

impl OrderHeap {
    /// Heap ordered for the buy side: highest price first, then earliest
    pub fn bids() -> Self {
        Self {
            items: Vec::new(),
            cmp: bid_priority,
        }
    }

    /// Heap ordered for the sell side: lowest price first, then earliest
    pub fn asks() -> Self {
        Self {
            items: Vec::new(),
            cmp: ask_priority,
        }
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the heap holds no orders
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an order. O(log n).
    pub fn insert(&mut self, order: Order) {
        self.items.push(order);
        self.sift_up(self.items.len() - 1);
    }

    /// Reference to the highest-priority order without removing it. O(1).
    pub fn peek(&self) -> Option<&Order> {
        self.items.first()
    }

    /// Remove and return the highest-priority order. O(log n).
    pub fn extract_top(&mut self) -> Option<Order> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Remove the order with the given id, wherever it sits. O(n).
    ///
    /// The vacated slot is filled from the tail and heap order is restored
    /// by sifting in both directions.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Order> {
        let pos = self.items.iter().position(|o| o.id == id)?;
        let removed = self.items.swap_remove(pos);
        if pos < self.items.len() {
            self.sift_up(pos);
            self.sift_down(pos);
        }
        Some(removed)
    }

    /// Record a partial fill on a resting order. O(n).
    ///
    /// The heap is not re-sifted: the comparators read only price and
    /// timestamp, and neither changes here. Revisit this if the ordering
    /// relation ever grows a quantity term.
    pub fn update_quantity(&mut self, id: &str, quantity: Decimal) -> bool {
        match self.items.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.quantity = quantity;
                order.status = common::OrderStatus::PartiallyFilled;
                true
            }
            None => false,
        }
    }

    /// Copies of all resting orders in raw heap order
    pub fn to_vec(&self) -> Vec<Order> {
        self.items.clone()
    }

    /// Copies of all resting orders, highest priority first
    pub fn to_sorted_vec(&self) -> Vec<Order> {
        let mut orders = self.items.clone();
        orders.sort_by(self.cmp);
        orders
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if (self.cmp)(&self.items[idx], &self.items[parent]) == Ordering::Less {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut best = idx;

            if left < len && (self.cmp)(&self.items[left], &self.items[best]) == Ordering::Less {
                best = left;
            }
            if right < len && (self.cmp)(&self.items[right], &self.items[best]) == Ordering::Less {
                best = right;
            }
            if best == idx {
                break;
            }
            self.items.swap(idx, best);
            idx = best;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Side;
    use rust_decimal_macros::dec;

    fn bid(id: &str, price: Decimal, ts: i64) -> Order {
        Order::limit(id, Side::Buy, price, dec!(1)).with_timestamp(ts)
    }

    fn ask(id: &str, price: Decimal, ts: i64) -> Order {
        Order::limit(id, Side::Sell, price, dec!(1)).with_timestamp(ts)
    }

    #[test]
    fn test_empty_heap() {
        let mut heap = OrderHeap::bids();
        assert!(heap.is_empty());
        assert!(heap.peek().is_none());
        assert!(heap.extract_top().is_none());
        assert!(heap.remove_by_id("nope").is_none());
    }

    #[test]
    fn test_bid_heap_prefers_highest_price() {
        let mut heap = OrderHeap::bids();
        heap.insert(bid("b1", dec!(99), 1));
        heap.insert(bid("b2", dec!(101), 2));
        heap.insert(bid("b3", dec!(100), 3));

        assert_eq!(heap.peek().map(|o| o.id.as_str()), Some("b2"));
        assert_eq!(heap.extract_top().map(|o| o.id).as_deref(), Some("b2"));
        assert_eq!(heap.extract_top().map(|o| o.id).as_deref(), Some("b3"));
        assert_eq!(heap.extract_top().map(|o| o.id).as_deref(), Some("b1"));
    }

    #[test]
    fn test_ask_heap_prefers_lowest_price() {
        let mut heap = OrderHeap::asks();
        heap.insert(ask("a1", dec!(105), 1));
        heap.insert(ask("a2", dec!(103), 2));
        heap.insert(ask("a3", dec!(104), 3));

        assert_eq!(heap.extract_top().map(|o| o.id).as_deref(), Some("a2"));
        assert_eq!(heap.extract_top().map(|o| o.id).as_deref(), Some("a3"));
        assert_eq!(heap.extract_top().map(|o| o.id).as_deref(), Some("a1"));
    }

    #[test]
    fn test_equal_prices_break_ties_by_timestamp() {
        let mut heap = OrderHeap::asks();
        heap.insert(ask("late", dec!(100), 2000));
        heap.insert(ask("early", dec!(100), 1000));

        assert_eq!(heap.peek().map(|o| o.id.as_str()), Some("early"));
    }

    #[test]
    fn test_remove_by_id_keeps_heap_order() {
        let mut heap = OrderHeap::bids();
        for (id, px) in [("b1", 95), ("b2", 97), ("b3", 99), ("b4", 96), ("b5", 98)] {
            heap.insert(bid(id, Decimal::from(px), 1));
        }

        let removed = heap.remove_by_id("b3").expect("b3 is resting");
        assert_eq!(removed.id, "b3");
        assert_eq!(heap.len(), 4);

        let drained: Vec<String> = std::iter::from_fn(|| heap.extract_top().map(|o| o.id)).collect();
        assert_eq!(drained, vec!["b5", "b2", "b4", "b1"]);
    }

    #[test]
    fn test_update_quantity_in_place() {
        let mut heap = OrderHeap::asks();
        heap.insert(ask("a1", dec!(100), 1));
        heap.insert(ask("a2", dec!(101), 2));

        assert!(heap.update_quantity("a1", dec!(0.25)));
        assert!(!heap.update_quantity("missing", dec!(1)));

        let top = heap.peek().expect("non-empty");
        assert_eq!(top.id, "a1");
        assert_eq!(top.quantity, dec!(0.25));
        assert_eq!(top.status, common::OrderStatus::PartiallyFilled);
    }

    #[test]
    fn test_sorted_vec_is_priority_order() {
        let mut heap = OrderHeap::bids();
        heap.insert(bid("b1", dec!(95), 5));
        heap.insert(bid("b2", dec!(99), 1));
        heap.insert(bid("b3", dec!(99), 0));

        let ids: Vec<String> = heap.to_sorted_vec().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["b3", "b2", "b1"]);
    }
}
