use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use order_book_engine::{api::router, exchange::Exchange};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> Router {
    let exchange = Arc::new(Exchange::new(["BTC_USD".to_string(), "ETH_USD".to_string()]));
    router(exchange)
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_order(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/order")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn unknown_market_on_book_is_rejected() {
    let app = test_app();
    let res = app
        .oneshot(Request::builder().uri("/book/DOGE_USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resting_limit_order_appears_in_book_then_cancel_removes_it() {
    let app = test_app();

    let create = json!({
        "type": "LIMIT",
        "bid": true,
        "size": 10,
        "price": 48,
        "userID": 1,
        "market": "BTC_USD",
    });

    let res = app.clone().oneshot(post_order(create)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ack = body_json(res).await;
    let order_id = ack["id"].as_u64().unwrap();

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/book/BTC_USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let snap = body_json(res).await;
    assert_eq!(snap["bids"][0]["price"].as_u64(), Some(48));
    assert_eq!(snap["bidsTotalVolume"].as_u64(), Some(10));

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/order/{order_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(Request::builder().uri("/book/BTC_USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let snap = body_json(res).await;
    assert!(snap["bids"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn market_order_matches_resting_liquidity_and_reports_fills() {
    let app = test_app();

    let seed = json!({
        "type": "LIMIT",
        "bid": false,
        "size": 5,
        "price": 52,
        "userID": 1,
        "market": "ETH_USD",
    });
    let res = app.clone().oneshot(post_order(seed)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let take = json!({
        "type": "MARKET",
        "bid": true,
        "size": 5,
        "userID": 2,
        "market": "ETH_USD",
    });
    let res = app.clone().oneshot(post_order(take)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ack = body_json(res).await;
    assert_eq!(ack["matches"].as_array().unwrap().len(), 1);
    assert_eq!(ack["matches"][0]["price"].as_u64(), Some(52));
    assert_eq!(ack["matches"][0]["size"].as_u64(), Some(5));

    let res = app
        .oneshot(Request::builder().uri("/book/volume/ETH_USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let volume = body_json(res).await;
    assert_eq!(volume["Ask"].as_u64(), Some(0));
}

#[tokio::test]
async fn market_order_with_insufficient_liquidity_is_rejected() {
    let app = test_app();

    let take = json!({
        "type": "MARKET",
        "bid": true,
        "size": 1,
        "userID": 2,
        "market": "BTC_USD",
    });

    let res = app.oneshot(post_order(take)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn zero_size_order_is_rejected_before_reaching_the_exchange() {
    let app = test_app();

    let bad = json!({
        "type": "LIMIT",
        "bid": true,
        "size": 0,
        "price": 10,
        "userID": 1,
        "market": "BTC_USD",
    });

    let res = app.oneshot(post_order(bad)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_body_is_rejected() {
    let app = test_app();
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/order")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_orders_endpoint_lists_resting_orders_across_markets() {
    let app = test_app();

    for market in ["BTC_USD", "ETH_USD"] {
        let body = json!({
            "type": "LIMIT",
            "bid": true,
            "size": 1,
            "price": 10,
            "userID": 7,
            "market": market,
        });
        let res = app.clone().oneshot(post_order(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app
        .oneshot(Request::builder().uri("/user/7/orders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed = body_json(res).await;
    assert_eq!(listed["orders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cancelling_an_unknown_order_is_not_an_error() {
    let app = test_app();
    let res = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/order/999999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
