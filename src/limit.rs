use std::collections::VecDeque;

use crate::order::Order;

/// A single resting trade: `incoming` (whichever side placed the market
/// order) paired against a resting order. `price` is always the resting
/// order's limit price.
#[derive(Debug, Clone)]
pub struct Match {
    pub bid_order_id: u64,
    pub ask_order_id: u64,
    pub price: u64,
    pub size_filled: u64,
}

/// A single price level on one side of a book: a FIFO queue of orders and
/// their cached aggregate volume.
///
/// `volume` is maintained incrementally by `add`/`delete`/`fill` rather than
/// recomputed on query, per §4.3's note that the source recomputes totals
/// on every call where an incremental aggregate would do.
#[derive(Debug)]
pub struct Limit {
    pub price: u64,
    orders: VecDeque<Order>,
    volume: u64,
}

impl Limit {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            volume: 0,
        }
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &VecDeque<Order> {
        &self.orders
    }

    pub fn get(&self, order_id: u64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Appends `order` to the tail of the queue, FIFO. Sets the order's
    /// back-reference to this level's price.
    pub fn add(&mut self, mut order: Order) {
        order.resting_at = Some(self.price);
        self.volume += order.size;
        self.orders.push_back(order);
    }

    /// Removes the order with the given id, preserving the FIFO order of
    /// the remaining orders. A no-op (returns `None`) if the order isn't
    /// present — per §4.1, `delete` on an absent order is not an error.
    ///
    /// The source's reference implementation swap-removes (moving the tail
    /// element into the removed slot), which is only safe because deletion
    /// there never happens mid-walk. This implementation always does an
    /// order-preserving removal so that property 7 in §8 (price-time
    /// priority) can never be violated by a stray cancellation.
    pub fn delete(&mut self, order_id: u64) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == order_id)?;
        let mut removed = self.orders.remove(pos)?;
        self.volume -= removed.size;
        removed.resting_at = None;
        Some(removed)
    }

    /// Walks the queue head-to-tail, pairing `incoming` against each
    /// resting order until either `incoming` is fully filled or the level
    /// is exhausted. Orders filled to zero are removed from the queue once
    /// the walk completes; `volume` is kept consistent throughout.
    ///
    /// Returns the produced matches alongside the ids of every resting
    /// order this walk drained to zero and removed. The level alone can't
    /// purge those ids from the book's order index — it doesn't hold a
    /// reference to it — so the caller (`Orderbook::place_market_order`)
    /// is responsible for removing each returned id from `order_index`.
    pub fn fill(&mut self, incoming: &mut Order) -> (Vec<Match>, Vec<u64>) {
        if incoming.size == 0 {
            return (Vec::new(), Vec::new());
        }

        let mut matches = Vec::new();

        for resting in self.orders.iter_mut() {
            if incoming.size == 0 {
                break;
            }
            let filled = incoming.size.min(resting.size);
            incoming.size -= filled;
            resting.size -= filled;
            self.volume -= filled;

            let (bid_order_id, ask_order_id) = match incoming.side {
                crate::order::Side::Bid => (incoming.id, resting.id),
                crate::order::Side::Ask => (resting.id, incoming.id),
            };
            matches.push(Match {
                bid_order_id,
                ask_order_id,
                price: self.price,
                size_filled: filled,
            });
        }

        // Orders fill strictly in queue order, so every exhausted order is
        // a prefix of the queue once the walk above completes.
        let mut filled_order_ids = Vec::new();
        while matches!(self.orders.front(), Some(front) if front.size == 0) {
            let mut gone = self.orders.pop_front().unwrap();
            gone.resting_at = None;
            filled_order_ids.push(gone.id);
        }

        (matches, filled_order_ids)
    }
}
