use serde::{Deserialize, Serialize};

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// The side an incoming order of this side matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// Limit orders rest in the book until matched or cancelled; market orders
/// execute immediately against the opposite side or are rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

/// A single order.
///
/// `resting_at` is the back-reference described in the design notes: rather
/// than a pointer into the `Limit` hosting this order, it is the price
/// handle of that `Limit` (prices are unique within a side, so this is
/// sufficient to find it again). `None` means the order is not currently
/// resting — either it hasn't been placed yet, or it has been filled or
/// cancelled.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub side: Side,
    pub order_type: OrderType,
    pub market: String,
    pub size: u64,
    pub timestamp: u64,
    pub resting_at: Option<u64>,
}

impl Order {
    pub fn is_resting(&self) -> bool {
        self.resting_at.is_some()
    }
}

/// Nanoseconds since `UNIX_EPOCH`. Good enough for a monotonic-within-process
/// arrival ordering; not used for anything load-bearing beyond display.
pub fn now_nanos() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos() as u64
}
