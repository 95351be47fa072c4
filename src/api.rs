//! The thin HTTP/JSON service layer (§6). Six endpoints, each a direct
//! translation of one `Exchange` operation; errors flow out as
//! `ExchangeError` and are rendered by its `IntoResponse` impl.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::warn;

use crate::errors::ExchangeError;
use crate::exchange::{Exchange, PlaceOrderRequest, Placement, matches_to_view};
use crate::order::OrderType;
use crate::views::{MatchView, OrderView, OrderbookView, VolumeView};

type ApiErr = (StatusCode, Json<serde_json::Value>);

fn bad_request(msg: &str) -> ApiErr {
    (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "msg": msg })))
}

/// Reads and deserializes the request body itself, logging a preview of
/// whatever malformed JSON the caller sent instead of silently swallowing it.
pub struct LoggedJson<T>(pub T);

impl<S, T> FromRequest<S> for LoggedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiErr;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| bad_request(&e.to_string()))?;

        match serde_json::from_slice::<T>(&bytes) {
            Ok(val) => Ok(LoggedJson(val)),
            Err(e) => {
                let preview = String::from_utf8_lossy(&bytes);
                let preview = &preview[..preview.len().min(4096)];
                warn!(error = %e, body_preview = %preview, "order rejected: JSON deserialization failed");
                Err(bad_request(&e.to_string()))
            }
        }
    }
}

/// Request payload for `POST /order` (§6).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewOrder {
    #[serde(rename = "type")]
    order_type: OrderType,
    bid: bool,
    size: u64,
    #[serde(default)]
    price: u64,
    user_id: u64,
    market: String,
}

/// Response for `POST /order` (§6): a confirmation message and the newly
/// generated order id, plus any matches an executed market order produced.
#[derive(Debug, Serialize)]
struct OrderAck {
    msg: &'static str,
    id: u64,
    matches: Vec<MatchView>,
}

/// `GET /book/{market}` — a full snapshot of both sides.
async fn get_book(
    State(exchange): State<Arc<Exchange>>,
    Path(market): Path<String>,
) -> Result<Json<OrderbookView>, ExchangeError> {
    Ok(Json(exchange.get_book(&market).await?))
}

/// `GET /book/volume/{market}` — just the two aggregate totals.
async fn get_volume(
    State(exchange): State<Arc<Exchange>>,
    Path(market): Path<String>,
) -> Result<Json<VolumeView>, ExchangeError> {
    Ok(Json(exchange.get_volume(&market).await?))
}

/// `POST /order` — places a limit or market order.
async fn place_order(
    State(exchange): State<Arc<Exchange>>,
    request: Result<LoggedJson<NewOrder>, ApiErr>,
) -> axum::response::Response {
    let LoggedJson(payload) = match request {
        Ok(payload) => payload,
        Err(rejection) => return rejection.into_response(),
    };

    if payload.size == 0 {
        return bad_request("size must be > 0").into_response();
    }
    if payload.order_type == OrderType::Limit && payload.price == 0 {
        return bad_request("limit orders require a non-zero price").into_response();
    }

    let placed = exchange
        .place_order(PlaceOrderRequest {
            order_type: payload.order_type,
            bid: payload.bid,
            size: payload.size,
            price: payload.price,
            user_id: payload.user_id,
            market: payload.market,
        })
        .await;

    let (id, placement) = match placed {
        Ok(ok) => ok,
        Err(e) => return e.into_response(),
    };

    let (msg, matches) = match placement {
        Placement::Limit => ("order resting", Vec::new()),
        Placement::Market(matches) => ("order filled", matches_to_view(&matches)),
    };

    Json(OrderAck { msg, id, matches }).into_response()
}

/// `GET /order/{orderId}` — a single resting order.
async fn get_order(
    State(exchange): State<Arc<Exchange>>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderView>, ExchangeError> {
    Ok(Json(exchange.get_order(order_id).await?))
}

/// `DELETE /order/{id}` — cancels a resting order. A no-op on an unknown id,
/// per §4.1.
async fn cancel_order(
    State(exchange): State<Arc<Exchange>>,
    Path(order_id): Path<u64>,
) -> Json<serde_json::Value> {
    exchange.cancel_order(order_id).await;
    Json(serde_json::json!({ "msg": "order cancelled", "id": order_id }))
}

#[derive(Debug, Serialize)]
struct UserOrdersResponse {
    orders: Vec<u64>,
}

/// `GET /user/{userId}/orders` — ids of a user's resting orders, across
/// every market.
async fn get_user_orders(
    State(exchange): State<Arc<Exchange>>,
    Path(user_id): Path<u64>,
) -> Json<UserOrdersResponse> {
    let mut orders: Vec<u64> = exchange.get_user_orders(user_id).await.into_iter().collect();
    orders.sort_unstable();
    Json(UserOrdersResponse { orders })
}

/// Constructs the application's `Router` with all routes and shared state.
pub fn router(exchange: Arc<Exchange>) -> Router {
    Router::new()
        .route("/book/{market}", get(get_book))
        .route("/book/volume/{market}", get(get_volume))
        .route("/order", post(place_order))
        .route("/order/{order_id}", get(get_order).delete(cancel_order))
        .route("/user/{user_id}/orders", get(get_user_orders))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false).level(tracing::Level::TRACE))
                .on_response(DefaultOnResponse::new().level(tracing::Level::TRACE)),
        )
        .with_state(exchange)
}
