//! Checkout, order management and inventory alerts.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use honor_culture_integration_tests::{TestContext, order_body};
use serde_json::json;

#[tokio::test]
async fn test_empty_cart_is_rejected_without_mutation() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let mut body = order_body();
    body["items"] = json!([]);
    let response = ctx.post("/api/orders", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json,
        json!({ "success": false, "message": "No items in order" })
    );

    let orders = ctx.request(Method::GET, "/api/orders", Some(&token), None).await;
    assert_eq!(orders.json, json!([]));
}

#[tokio::test]
async fn test_missing_shipping_is_rejected() {
    let ctx = TestContext::new().await;

    let mut body = order_body();
    body["shippingInfo"]["postalCode"] = json!("  ");
    let response = ctx.post("/api/orders", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Missing shipping information");
}

#[tokio::test]
async fn test_place_order_stores_detached_redacted_copy() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let placed = ctx.post("/api/orders", order_body()).await;
    assert_eq!(placed.status, StatusCode::OK, "{}", placed.text);
    assert_eq!(placed.json["success"], true);
    assert_eq!(placed.json["message"], "Order placed successfully");
    let order_id = placed.json["orderId"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("ORD-"));
    assert_eq!(placed.json["order"]["total"].as_f64(), Some(90.0));
    assert_eq!(placed.json["order"]["status"], "Pending");
    assert_eq!(
        placed.json["order"]["paymentInfo"],
        json!({ "cardHolderName": "Jordan Reyes", "lastFourDigits": "4242" })
    );
    assert!(!placed.text.contains("4242 4242"));

    // Removing the product must not reach the stored order.
    let deleted = ctx
        .request(Method::DELETE, "/api/products/p1", Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let stored = ctx
        .request(Method::GET, &format!("/api/orders/{order_id}"), Some(&token), None)
        .await;
    assert_eq!(stored.status, StatusCode::OK);
    assert_eq!(stored.json["items"], placed.json["order"]["items"]);
    assert_eq!(stored.json["items"][0]["name"], "Performance Tee");
    assert_eq!(stored.json["items"][0]["image"], "https://example.com/tee.jpg");

    let orders = ctx.request(Method::GET, "/api/orders", Some(&token), None).await;
    assert_eq!(orders.json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_place_order_notifies_in_background() {
    let ctx = TestContext::new().await;

    let placed = ctx.post("/api/orders", order_body()).await;
    assert_eq!(placed.status, StatusCode::OK);

    let messages = ctx.notifier.wait_for(1).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains(placed.json["orderId"].as_str().unwrap()));
    assert!(messages[0].contains("Jordan Reyes"));
}

#[tokio::test]
async fn test_failed_notification_does_not_fail_order() {
    let ctx = TestContext::new().await;
    ctx.notifier.fail_deliveries();

    let placed = ctx.post("/api/orders", order_body()).await;
    assert_eq!(placed.status, StatusCode::OK);
    assert_eq!(placed.json["success"], true);
}

#[tokio::test]
async fn test_order_endpoints_require_a_session() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.get("/api/orders").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        ctx.get("/api/orders/ORD-1").await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_update_order_status() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let placed = ctx.post("/api/orders", order_body()).await;
    let uri = format!("/api/orders/{}", placed.json["orderId"].as_str().unwrap());

    let shipped = ctx
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "status": "Shipped" })))
        .await;
    assert_eq!(shipped.status, StatusCode::OK);
    assert_eq!(shipped.json["status"], "Shipped");
    assert!(shipped.json["updatedAt"].is_string());

    let invalid = ctx
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "status": "Lost" })))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let missing = ctx
        .request(
            Method::PUT,
            "/api/orders/ORD-0",
            Some(&token),
            Some(json!({ "status": "Shipped" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json["error"], "Order not found");

    let log = ctx
        .request(Method::GET, "/api/audit-log?limit=1", Some(&token), None)
        .await;
    assert_eq!(log.json[0]["action"], "UPDATE_ORDER");
}

#[tokio::test]
async fn test_inventory_alerts() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    ctx.request(
        Method::PUT,
        "/api/products/p6",
        Some(&token),
        Some(json!({ "inventory": 0 })),
    )
    .await;

    let alerts = ctx
        .request(Method::GET, "/api/inventory/alerts?threshold=45", Some(&token), None)
        .await;
    assert_eq!(alerts.status, StatusCode::OK);

    let low: Vec<&str> = alerts.json["lowStock"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(low, vec!["p4", "p6"]);
    assert_eq!(alerts.json["outOfStock"][0]["id"], "p6");
    assert_eq!(alerts.json["outOfStock"][0]["variantStock"], 15);
    assert_eq!(alerts.json["total"], 3);

    let default = ctx
        .request(Method::GET, "/api/inventory/alerts", Some(&token), None)
        .await;
    assert_eq!(default.json["lowStock"].as_array().unwrap().len(), 1);

    let unauthorized = ctx.get("/api/inventory/alerts").await;
    assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
}
