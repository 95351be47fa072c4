use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// §7's error kinds, mapped centrally to an HTTP status + JSON body via
/// `IntoResponse` rather than scattered per-handler `match`es.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("market not found")]
    UnknownMarket,

    #[error("orderbook cannot fulfill requested market order")]
    InsufficientVolume,

    #[error("{0}")]
    MalformedInput(String),

    #[error("order not found")]
    UnknownOrder,
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response {
        let status = match self {
            ExchangeError::UnknownMarket => StatusCode::BAD_REQUEST,
            ExchangeError::InsufficientVolume => StatusCode::CONFLICT,
            ExchangeError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ExchangeError::UnknownOrder => StatusCode::BAD_REQUEST,
        };

        let body = match self {
            ExchangeError::InsufficientVolume => json!({
                "msg": "Orderbook cannot fulfill requested market order",
                "reason": "Not enough volume",
            }),
            other => json!({ "msg": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
