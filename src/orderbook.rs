use std::collections::{BTreeMap, HashMap};

use crate::limit::{Limit, Match};
use crate::order::{Order, OrderType, Side};

/// Where a resting order lives within its book: which side, and at which
/// price. Rust's ownership model means the order itself lives in exactly
/// one place — the `Limit`'s queue — so rather than a second `order_id →
/// Order` map holding a duplicate value, the book's order index stores this
/// locator and looks the order up through its `Limit` when needed.
#[derive(Debug, Clone, Copy)]
struct OrderLocation {
    side: Side,
    price: u64,
}

/// One market's order book: two sides of price levels plus an index from
/// resting order id to its location.
///
/// Each side is a single `BTreeMap<price, Limit>`. That map plays both
/// roles described in §3 (the side's collection of levels, and the side's
/// price→Limit index) at once, which makes "the set of `Limit` objects in a
/// side's collection equals the set of values in the side's price index"
/// true by construction instead of by separately-maintained bookkeeping.
/// Asks present ascending by iterating the map forwards; bids present
/// descending by iterating it in reverse.
pub struct Orderbook {
    asks: BTreeMap<u64, Limit>,
    bids: BTreeMap<u64, Limit>,
    order_index: HashMap<u64, OrderLocation>,
}

impl Orderbook {
    pub fn new() -> Self {
        Self {
            asks: BTreeMap::new(),
            bids: BTreeMap::new(),
            order_index: HashMap::new(),
        }
    }

    fn side_map(&self, side: Side) -> &BTreeMap<u64, Limit> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_map_mut(&mut self, side: Side) -> &mut BTreeMap<u64, Limit> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Ask levels ascending by price (lowest first).
    pub fn asks(&self) -> impl Iterator<Item = &Limit> {
        self.asks.values()
    }

    /// Bid levels descending by price (highest first).
    pub fn bids(&self) -> impl Iterator<Item = &Limit> {
        self.bids.values().rev()
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next_back().copied()
    }

    pub fn asks_total_volume(&self) -> u64 {
        self.asks.values().map(Limit::volume).sum()
    }

    pub fn bids_total_volume(&self) -> u64 {
        self.bids.values().map(Limit::volume).sum()
    }

    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let loc = self.order_index.get(&order_id)?;
        self.side_map(loc.side).get(&loc.price)?.get(order_id)
    }

    /// §4.3 `placeLimitOrder`: rests `order` at `price` on its side. Never
    /// crosses the opposite side — per the Open Question in §9/§10, a
    /// marketable limit simply rests, matching the original source's
    /// behavior rather than the teacher's crossing behavior.
    pub fn place_limit_order(&mut self, price: u64, order: Order) {
        debug_assert_eq!(order.order_type, OrderType::Limit);
        let side = order.side;
        let order_id = order.id;

        let level = self
            .side_map_mut(side)
            .entry(price)
            .or_insert_with(|| Limit::new(price));
        level.add(order);

        self.order_index.insert(order_id, OrderLocation { side, price });
    }

    /// §4.3 `placeMarketOrder`: walks the opposite side best-price-first
    /// until `order` is fully filled, or rejects outright if the opposite
    /// side doesn't hold enough volume — a market order either executes in
    /// full or not at all, it never rests a leftover.
    ///
    /// Returns the produced matches alongside the ids of every resting
    /// maker order this walk fully consumed and removed from the book.
    /// Those ids are already gone from `order_index` by the time this
    /// returns; the caller (`Exchange::place_order`) still needs them to
    /// purge its own cross-market `orders`/`user_orders` bookkeeping.
    pub fn place_market_order(&mut self, mut order: Order) -> Option<(Vec<Match>, Vec<u64>)> {
        debug_assert_eq!(order.order_type, OrderType::Market);
        let target_side = order.side.opposite();
        let available = match target_side {
            Side::Bid => self.bids_total_volume(),
            Side::Ask => self.asks_total_volume(),
        };
        if order.size > available {
            return None;
        }

        let mut matches = Vec::new();
        let mut filled_order_ids = Vec::new();
        let mut emptied_prices = Vec::new();

        let prices: Vec<u64> = match target_side {
            // asks: best (lowest) first. bids: best (highest) first.
            Side::Ask => self.asks.keys().copied().collect(),
            Side::Bid => self.bids.keys().rev().copied().collect(),
        };

        for price in prices {
            if order.size == 0 {
                break;
            }
            let level = self
                .side_map_mut(target_side)
                .get_mut(&price)
                .expect("price collected from the live side map");
            let (level_matches, level_filled_ids) = level.fill(&mut order);
            matches.extend(level_matches);
            filled_order_ids.extend(level_filled_ids);
            if level.is_empty() {
                emptied_prices.push(price);
            }
        }

        for price in emptied_prices {
            self.clear_limit(target_side, price);
        }

        // Every maker order this walk drained to zero is no longer resting;
        // it must leave the order-id index just like an explicit cancel
        // would (§3: "the order-id index indexes every resting order").
        for id in &filled_order_ids {
            self.order_index.remove(id);
        }

        debug_assert_eq!(order.size, 0, "a market order either fills in full or is rejected");
        Some((matches, filled_order_ids))
    }

    /// §4.3 `cancelOrder`. A safe no-op if the order is unknown or already
    /// filled/cancelled.
    pub fn cancel_order(&mut self, order_id: u64) -> bool {
        let Some(loc) = self.order_index.remove(&order_id) else {
            return false;
        };
        let Some(level) = self.side_map_mut(loc.side).get_mut(&loc.price) else {
            return false;
        };
        let removed = level.delete(order_id).is_some();
        if level.is_empty() {
            self.clear_limit(loc.side, loc.price);
        }
        removed
    }

    /// Removes an empty level from both its side's collection and price
    /// index (one and the same `BTreeMap` here — see the struct docs).
    /// Must be called whenever a level becomes empty; failing to do so
    /// violates the "no empty level retained" invariant (§8 property 4).
    fn clear_limit(&mut self, side: Side, price: u64) {
        self.side_map_mut(side).remove(&price);
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}
