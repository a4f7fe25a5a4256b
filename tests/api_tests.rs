//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Integration tests for the HTTP transport: every route, the decimal-string
// and timestamp wire formats, and the status-code mapping.
//--------------------------------------------------------------------------------------------------

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use hyper::Response;
use serde_json::{Value, from_slice, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use matchbook::{Api, MatchingEngine};

/// Sets up a test router plus the engine behind it, so tests can inspect
/// engine state directly.
fn setup_test_router() -> (Router, Arc<MatchingEngine>) {
    let engine = Arc::new(MatchingEngine::new());
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let api = Api::new(addr, Arc::clone(&engine), 10);
    (api.routes(), engine)
}

/// Helper to parse JSON responses.
async fn parse_json_response(response: Response<Body>) -> Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    from_slice(&body_bytes).unwrap()
}

async fn post_order(app: &Router, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::post("/orders")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup_test_router();

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_limit_order() {
    let (app, _) = setup_test_router();

    let response = post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "limit",
            "side": "buy",
            "quantity": "1.5",
            "price": "50000.50"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_json_response(response).await;

    assert_eq!(body["status"], "pending");
    // Exact subtraction keeps the submitted scale: 1.5 - 1.5 renders as 0.0.
    assert_eq!(body["filled_quantity"], "0.0");
    assert_eq!(body["remaining_quantity"], "1.5");
    assert!(body["trades"].as_array().unwrap().is_empty());
    assert!(Uuid::parse_str(body["order_id"].as_str().unwrap()).is_ok());

    // Timestamps are ISO-8601 UTC with microseconds and a trailing Z.
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(timestamp.ends_with('Z'));
    assert_eq!(timestamp.split('.').nth(1).unwrap().len(), 7); // 6 digits + Z
}

#[tokio::test]
async fn test_crossing_order_returns_trades() {
    let (app, _) = setup_test_router();

    let response = post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "limit",
            "side": "sell",
            "quantity": "1.0",
            "price": "50100"
        }),
    )
    .await;
    let maker = parse_json_response(response).await;

    let response = post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "limit",
            "side": "buy",
            "quantity": "0.4",
            "price": "50100"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let taker = parse_json_response(response).await;

    assert_eq!(taker["status"], "filled");
    assert_eq!(taker["filled_quantity"], "0.4");

    let trades = taker["trades"].as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["symbol"], "BTC-USD");
    assert_eq!(trades[0]["price"], "50100");
    assert_eq!(trades[0]["quantity"], "0.4");
    assert_eq!(trades[0]["aggressor_side"], "buy");
    assert_eq!(trades[0]["maker_order_id"], maker["order_id"]);
    assert_eq!(trades[0]["taker_order_id"], taker["order_id"]);
}

#[tokio::test]
async fn test_rejected_order_maps_to_400() {
    let (app, _) = setup_test_router();

    // Market orders must not carry a price.
    let response = post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "market",
            "side": "buy",
            "quantity": "1.0",
            "price": "50000"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_json_response(response).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["filled_quantity"], "0");
    assert!(body["trades"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_order_type_is_a_client_error() {
    let (app, _) = setup_test_router();

    let response = post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "stop",
            "side": "buy",
            "quantity": "1.0",
            "price": "50000"
        }),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cancel_order() {
    let (app, _) = setup_test_router();

    let response = post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "limit",
            "side": "buy",
            "quantity": "1.0",
            "price": "50000"
        }),
    )
    .await;
    let body = parse_json_response(response).await;
    let order_id = body["order_id"].as_str().unwrap().to_string();

    let url = format!("/orders/{}?symbol=BTC-USD", order_id);
    let response = app
        .clone()
        .oneshot(Request::delete(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["order_id"], order_id.as_str());
    assert_eq!(body["status"], "cancelled");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

    // A second cancel finds nothing.
    let response = app
        .clone()
        .oneshot(Request::delete(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_json_response(response).await;
    assert_eq!(body["detail"], "Order not found");
}

#[tokio::test]
async fn test_cancel_requires_symbol() {
    let (app, _) = setup_test_router();

    let url = format!("/orders/{}", Uuid::new_v4());
    let response = app
        .clone()
        .oneshot(Request::delete(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_unknown_symbol_is_404() {
    let (app, _) = setup_test_router();

    let url = format!("/orders/{}?symbol=NO-PAIR", Uuid::new_v4());
    let response = app
        .clone()
        .oneshot(Request::delete(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_json_response(response).await;
    assert_eq!(body["detail"], "Order not found");
}

#[tokio::test]
async fn test_get_bbo() {
    let (app, _) = setup_test_router();

    // Empty book: both sides null.
    let response = app
        .clone()
        .oneshot(
            Request::get("/symbols/BTC-USD/bbo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["symbol"], "BTC-USD");
    assert!(body["best_bid"].is_null());
    assert!(body["best_ask"].is_null());

    post_order(
        &app,
        json!({
            "symbol": "BTC-USD",
            "order_type": "limit",
            "side": "buy",
            "quantity": "1.5",
            "price": "50000"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/symbols/BTC-USD/bbo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = parse_json_response(response).await;
    assert_eq!(body["best_bid"], "50000");
    assert_eq!(body["best_bid_quantity"], "1.5");
    assert!(body["best_ask"].is_null());
}

#[tokio::test]
async fn test_get_depth() {
    let (app, _) = setup_test_router();

    for (side, price) in [
        ("buy", "50000"),
        ("buy", "49900"),
        ("sell", "50100"),
        ("sell", "50200"),
    ] {
        post_order(
            &app,
            json!({
                "symbol": "BTC-USD",
                "order_type": "limit",
                "side": side,
                "quantity": "1.0",
                "price": price
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(
            Request::get("/symbols/BTC-USD/depth")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;

    // Bids high to low, asks low to high, entries as [price, quantity] pairs.
    assert_eq!(body["bids"][0][0], "50000");
    assert_eq!(body["bids"][1][0], "49900");
    assert_eq!(body["asks"][0][0], "50100");
    assert_eq!(body["asks"][1][0], "50200");
    assert_eq!(body["bids"][0][1], "1.0");

    // The depth parameter caps the levels per side.
    let response = app
        .clone()
        .oneshot(
            Request::get("/symbols/BTC-USD/depth?depth=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = parse_json_response(response).await;
    assert_eq!(body["bids"].as_array().unwrap().len(), 1);
    assert_eq!(body["asks"].as_array().unwrap().len(), 1);
}
