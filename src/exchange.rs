use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::errors::ExchangeError;
use crate::limit::Match;
use crate::order::{Order, OrderType, Side, now_nanos};
use crate::orderbook::Orderbook;
use crate::views::{MatchView, OrderView, OrderbookView, VolumeView};

/// A placement request as decoded off the wire (§6 `POST /order`).
pub struct PlaceOrderRequest {
    pub order_type: OrderType,
    pub bid: bool,
    pub size: u64,
    pub price: u64,
    pub user_id: u64,
    pub market: String,
}

/// What a successful placement produced — a resting limit order, or the
/// matches an executed market order generated.
pub enum Placement {
    Limit,
    Market(Vec<Match>),
}

struct OrderMeta {
    market: String,
    user_id: u64,
}

/// Fan-out over markets, plus the cross-market bookkeeping (§4.4) that lets
/// callers cancel by id and list a user's resting orders without knowing
/// which market each one belongs to.
///
/// A single `RwLock` guards all books and indices together. Writers (place/
/// cancel) hold it for the duration of one operation; readers (book/volume/
/// order/user-orders queries) take the read guard. This is coarser than a
/// per-book lock, but satisfies §5's single-writer-per-book contract (the
/// whole exchange is serialized, which certainly serializes each book) and
/// matches the teacher's own `Arc<RwLock<HashMap<Pair, OrderBook>>>` shape.
pub struct Exchange {
    state: RwLock<ExchangeState>,
}

struct ExchangeState {
    books: HashMap<String, Orderbook>,
    orders: HashMap<u64, OrderMeta>,
    user_orders: HashMap<u64, HashSet<u64>>,
}

impl Exchange {
    pub fn new(markets: impl IntoIterator<Item = String>) -> Self {
        let books = markets.into_iter().map(|m| (m, Orderbook::new())).collect();
        Self {
            state: RwLock::new(ExchangeState {
                books,
                orders: HashMap::new(),
                user_orders: HashMap::new(),
            }),
        }
    }

    /// §4.4 `placeOrder`. Generates a fresh 63-bit random id (regenerated
    /// on collision against the order index, per §9), delegates to the
    /// selected `Orderbook`, and — per the Open Question resolved in §10 —
    /// only records the order in the cross-market indices on success. A
    /// rejected market order leaves no trace anywhere.
    ///
    /// A market order never rests, so its own id is never indexed here
    /// either way — only a resting limit order earns an `orders`/
    /// `user_orders` entry. And since `place_market_order` may fully
    /// consume one or more resting makers, their ids are purged from these
    /// same cross-market indices the moment the book reports them filled —
    /// otherwise a filled maker's id would keep appearing in
    /// `get_user_orders` forever even though `get_order` already reports
    /// it unknown.
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<(u64, Placement), ExchangeError> {
        let mut state = self.state.write().await;

        if !state.books.contains_key(&request.market) {
            return Err(ExchangeError::UnknownMarket);
        }

        let id = loop {
            let candidate = rand::random::<u64>() & 0x7FFF_FFFF_FFFF_FFFF;
            if !state.orders.contains_key(&candidate) {
                break candidate;
            }
        };

        let order = Order {
            id,
            user_id: request.user_id,
            side: if request.bid { Side::Bid } else { Side::Ask },
            order_type: request.order_type,
            market: request.market.clone(),
            size: request.size,
            timestamp: now_nanos(),
            resting_at: None,
        };

        let book = state.books.get_mut(&request.market).expect("checked above");

        let placement = match request.order_type {
            OrderType::Limit => {
                let price = request.price;
                book.place_limit_order(price, order);
                state.orders.insert(
                    id,
                    OrderMeta {
                        market: request.market,
                        user_id: request.user_id,
                    },
                );
                state.user_orders.entry(request.user_id).or_default().insert(id);
                Placement::Limit
            }
            OrderType::Market => match book.place_market_order(order) {
                Some((matches, filled_maker_ids)) => {
                    for maker_id in filled_maker_ids {
                        if let Some(meta) = state.orders.remove(&maker_id) {
                            if let Some(ids) = state.user_orders.get_mut(&meta.user_id) {
                                ids.remove(&maker_id);
                            }
                        }
                    }
                    Placement::Market(matches)
                }
                None => return Err(ExchangeError::InsufficientVolume),
            },
        };

        Ok((id, placement))
    }

    /// §4.4 `cancelOrder`. A safe no-op if the order is unknown.
    pub async fn cancel_order(&self, order_id: u64) {
        let mut state = self.state.write().await;
        let Some(meta) = state.orders.remove(&order_id) else {
            return;
        };
        if let Some(book) = state.books.get_mut(&meta.market) {
            book.cancel_order(order_id);
        }
        if let Some(ids) = state.user_orders.get_mut(&meta.user_id) {
            ids.remove(&order_id);
        }
    }

    pub async fn get_order(&self, order_id: u64) -> Result<OrderView, ExchangeError> {
        let state = self.state.read().await;
        let meta = state.orders.get(&order_id).ok_or(ExchangeError::UnknownOrder)?;
        let book = state.books.get(&meta.market).ok_or(ExchangeError::UnknownOrder)?;
        let order = book.get_order(order_id).ok_or(ExchangeError::UnknownOrder)?;
        Ok(OrderView::from_order(order))
    }

    pub async fn get_user_orders(&self, user_id: u64) -> HashSet<u64> {
        let state = self.state.read().await;
        state.user_orders.get(&user_id).cloned().unwrap_or_default()
    }

    pub async fn get_book(&self, market: &str) -> Result<OrderbookView, ExchangeError> {
        let state = self.state.read().await;
        let book = state.books.get(market).ok_or(ExchangeError::UnknownMarket)?;
        Ok(OrderbookView::from_book(book))
    }

    pub async fn get_volume(&self, market: &str) -> Result<VolumeView, ExchangeError> {
        let state = self.state.read().await;
        let book = state.books.get(market).ok_or(ExchangeError::UnknownMarket)?;
        Ok(VolumeView::from_book(book))
    }
}

pub fn matches_to_view(matches: &[Match]) -> Vec<MatchView> {
    matches.iter().map(MatchView::from).collect()
}
