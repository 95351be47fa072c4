//! Read-only value types carrying the snapshot fields the HTTP layer
//! serializes, per §4.5. Built by flattening live `Orderbook`/`Limit` state
//! so callers never hold a reference into the mutable core.

use serde::Serialize;

use crate::limit::Match;
use crate::order::{Order, Side};
use crate::orderbook::Orderbook;

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: u64,
    #[serde(rename = "userID")]
    pub user_id: u64,
    pub price: u64,
    pub size: u64,
    pub bid: bool,
    pub timestamp: u64,
}

impl OrderView {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            price: order.resting_at.expect("view is only built for resting orders"),
            size: order.size,
            bid: order.side == Side::Bid,
            timestamp: order.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    #[serde(rename = "idBid")]
    pub id_bid: u64,
    #[serde(rename = "idAsk")]
    pub id_ask: u64,
    pub size: u64,
    pub price: u64,
}

impl From<&Match> for MatchView {
    fn from(m: &Match) -> Self {
        Self {
            id_bid: m.bid_order_id,
            id_ask: m.ask_order_id,
            size: m.size_filled,
            price: m.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderbookView {
    #[serde(rename = "bidsTotalVolume")]
    pub bids_total_volume: u64,
    #[serde(rename = "asksTotalVolume")]
    pub asks_total_volume: u64,
    pub asks: Vec<OrderView>,
    pub bids: Vec<OrderView>,
}

impl OrderbookView {
    /// Flattens each side's levels (in the side's presented order) and,
    /// within each level, its FIFO order sequence.
    pub fn from_book(book: &Orderbook) -> Self {
        let asks = book
            .asks()
            .flat_map(|limit| limit.orders().iter().map(OrderView::from_order))
            .collect();
        let bids = book
            .bids()
            .flat_map(|limit| limit.orders().iter().map(OrderView::from_order))
            .collect();
        Self {
            bids_total_volume: book.bids_total_volume(),
            asks_total_volume: book.asks_total_volume(),
            asks,
            bids,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeView {
    #[serde(rename = "Bid")]
    pub bid: u64,
    #[serde(rename = "Ask")]
    pub ask: u64,
}

impl VolumeView {
    pub fn from_book(book: &Orderbook) -> Self {
        Self {
            bid: book.bids_total_volume(),
            ask: book.asks_total_volume(),
        }
    }
}
