//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (axum::Router, Arc<api::AppState>) {
    let catalog = api::seed_catalog();
    let state = api::create_default_state(catalog, "x-session-id");
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

fn get(uri: &str, session: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-session-id", session)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, session: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-session-id", session)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn post(uri: &str, session: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-session-id", session)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_products() {
    let (app, _) = setup();

    let response = app.oneshot(get("/products", "s1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let products = json.as_array().unwrap();
    assert_eq!(products.len(), 4);
    assert_eq!(products[0]["id"], "AA1ITC");
    assert_eq!(products[0]["unit_price_cents"], 110);
    assert_eq!(products[0]["available"], 10);
}

#[tokio::test]
async fn test_get_unknown_product_is_404() {
    let (app, _) = setup();

    let response = app.oneshot(get("/products/ZZ9MISSING", "s1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_basket_requires_session_header() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/basket")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_and_list_basket_items() {
    let (app, _) = setup();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "client-a",
            serde_json::json!({ "product_id": "AA1ITC", "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["lines"][0]["product_id"], "AA1ITC");
    assert_eq!(json["lines"][0]["quantity"], 2);

    // Same session sees the same basket; adding merges into the line.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "client-a",
            serde_json::json!({ "product_id": "AA1ITC", "quantity": 3 }),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["lines"].as_array().unwrap().len(), 1);
    assert_eq!(json["lines"][0]["quantity"], 5);

    // A different session gets its own basket.
    let response = app.oneshot(get("/basket", "client-b")).await.unwrap();
    let json = body_json(response).await;
    assert!(json["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_zero_quantity_is_bad_request() {
    let (app, _) = setup();

    let response = app
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "s1",
            serde_json::json!({ "product_id": "AA1ITC", "quantity": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_beyond_stock_is_conflict() {
    let (app, _) = setup();

    // Only one unit of tea is in stock.
    let response = app
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "s1",
            serde_json::json!({ "product_id": "BB2TEA", "quantity": 2 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_add_unknown_product_is_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "s1",
            serde_json::json!({ "product_id": "ZZ9MISSING", "quantity": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_and_clear_basket() {
    let (app, _) = setup();

    app.clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "s1",
            serde_json::json!({ "product_id": "C1CCHC", "quantity": 3 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "DELETE",
            "/basket/items",
            "s1",
            serde_json::json!({ "product_id": "C1CCHC", "quantity": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["lines"][0]["quantity"], 2);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/basket")
                .header("x-session-id", "s1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/basket", "s1")).await.unwrap();
    let json = body_json(response).await;
    assert!(json["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_empty_basket_is_eligible_with_both_methods() {
    let (app, _) = setup();

    // An empty basket totals zero, below the cash threshold.
    let response = app.oneshot(post("/checkout", "s1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["eligible"], true);
    assert_eq!(json["payment_methods"][0], "Card");
    assert_eq!(json["payment_methods"][1], "Cash");
}

#[tokio::test]
async fn test_checkout_above_threshold_is_card_only() {
    let (app, _) = setup();

    // 5 chocolates at 3.50 total 17.50, above the 10.00 cash cutoff.
    app.clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "s1",
            serde_json::json!({ "product_id": "C1CCHC", "quantity": 5 }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(post("/checkout", "s1")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["eligible"], true);
    assert_eq!(
        json["payment_methods"],
        serde_json::json!(["Card"])
    );
}

#[tokio::test]
async fn test_full_purchase_flow() {
    let (app, state) = setup();

    app.clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "buyer",
            serde_json::json!({ "product_id": "AA1ITC", "quantity": 2 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "buyer",
            serde_json::json!({ "product_id": "C1CCHC", "quantity": 3 }),
        ))
        .await
        .unwrap();

    let basket = body_json(app.clone().oneshot(get("/basket", "buyer")).await.unwrap()).await;
    let basket_id = common::BasketId::parse_str(basket["basket_id"].as_str().unwrap()).unwrap();

    // Checkout opens the order; /order shows it priced but not completed.
    let json = body_json(app.clone().oneshot(post("/checkout", "buyer")).await.unwrap()).await;
    assert_eq!(json["eligible"], true);
    let json = body_json(app.clone().oneshot(get("/order", "buyer")).await.unwrap()).await;
    assert_eq!(json["completed"], false);
    assert_eq!(json["total_cents"], 1270);

    let response = app.clone().oneshot(post("/pay", "buyer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["paid"], true);

    // Stock was decremented.
    let response = app
        .clone()
        .oneshot(get("/products/AA1ITC", "buyer"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["available"], 8);

    // The session dropped its basket binding, so /order no longer
    // resolves; the row itself is completed with the recorded total.
    let response = app.clone().oneshot(get("/order", "buyer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    use stores::OrderStore;
    let order = state
        .orders
        .find_by_basket_id(&basket_id)
        .await
        .unwrap()
        .unwrap();
    assert!(order.is_completed());
    assert_eq!(order.total_price().cents(), 1270);
    assert_eq!(order.payment_method().to_string(), "Card");
}

#[tokio::test]
async fn test_pay_again_after_purchase_is_not_paid() {
    let (app, _) = setup();

    app.clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "buyer",
            serde_json::json!({ "product_id": "AA1ITC", "quantity": 2 }),
        ))
        .await
        .unwrap();

    let json = body_json(app.clone().oneshot(post("/pay", "buyer")).await.unwrap()).await;
    assert_eq!(json["paid"], true);

    // The session dropped its basket binding, so the retry pays an empty
    // fresh basket and reports not paid.
    let response = app.oneshot(post("/pay", "buyer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["paid"], false);
}

#[tokio::test]
async fn test_gateway_failure_surfaces_as_bad_gateway() {
    let (app, state) = setup();

    app.clone()
        .oneshot(send_json(
            "POST",
            "/basket/items",
            "buyer",
            serde_json::json!({ "product_id": "AA1ITC", "quantity": 1 }),
        ))
        .await
        .unwrap();

    state.gateway.set_fail_on_authorize(true).await;

    let response = app.clone().oneshot(post("/pay", "buyer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The basket survived the failed attempt.
    let response = app.oneshot(get("/basket", "buyer")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_before_checkout_is_404() {
    let (app, _) = setup();

    let response = app.oneshot(get("/order", "s1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authenticated_sessions_share_a_basket_across_regeneration() {
    let (app, _) = setup();

    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/basket/items")
                .header("x-session-id", "first-visit")
                .header("x-principal", "alice")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "product_id": "AA1ITC", "quantity": 2 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    // A brand new session id for the same principal lands on the same basket.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/basket")
                .header("x-session-id", "second-visit")
                .header("x-principal", "alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["lines"][0]["quantity"], 2);
}
