//! Catalog endpoints: listing, filters, writes, bulk operations.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use honor_culture_integration_tests::TestContext;
use serde_json::{Value, json};

fn ids(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_products_is_public() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_filter_by_category_and_price() {
    let ctx = TestContext::new().await;

    let response = ctx
        .get("/api/products?category=Men%27s&minPrice=40&maxPrice=60")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ids(&response.json), vec!["p1"]);

    for product in response.json.as_array().unwrap() {
        let price = product["price"].as_f64().unwrap();
        assert_eq!(product["category"], "Men's");
        assert!((40.0..=60.0).contains(&price));
    }
}

#[tokio::test]
async fn test_category_all_means_no_filter() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/products?category=All").await;
    assert_eq!(response.json.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_invalid_price_filter_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/products?minPrice=cheap").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "Invalid minPrice");
}

#[tokio::test]
async fn test_get_product_and_not_found() {
    let ctx = TestContext::new().await;

    let found = ctx.get("/api/products/p2").await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json["name"], "Women's Flex Leggings");

    let missing = ctx.get("/api/products/nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json["error"], "Product not found");
}

#[tokio::test]
async fn test_create_product_parses_string_price_and_assigns_unique_ids() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let mut created = Vec::new();
    for name in ["Lifting Belt", "Wrist Wraps", "Chalk Bag"] {
        let response = ctx
            .request(
                Method::POST,
                "/api/products",
                Some(&token),
                Some(json!({ "name": name, "price": "24.50", "category": "Accessories" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        assert_eq!(response.json["price"].as_f64(), Some(24.5));
        created.push(response.json["id"].as_str().unwrap().to_string());
    }

    let all = ctx.get("/api/products").await;
    let all_ids = ids(&all.json);
    let mut unique = all_ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), all_ids.len());
    assert!(created.iter().all(|id| id.starts_with('p')));
}

#[tokio::test]
async fn test_create_product_applies_defaults() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let response = ctx
        .request(
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({ "name": "Shaker", "price": 12 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["colors"], json!(["Black"]));
    assert_eq!(response.json["sizes"], json!(["M"]));
    assert_eq!(response.json["inventory"], 50);
    assert_eq!(response.json["images"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_product_validation() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let no_name = ctx
        .request(Method::POST, "/api/products", Some(&token), Some(json!({ "price": 10 })))
        .await;
    assert_eq!(no_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_name.json["error"], "Product name is required");

    let negative = ctx
        .request(
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({ "name": "Refund", "price": -1 })),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_writes_require_a_session() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post("/api/products", json!({ "name": "Sneaky", "price": 1 }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"], "Unauthorized");
    assert_eq!(ctx.get("/api/products").await.json.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_update_product_merges_fields() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let response = ctx
        .request(
            Method::PUT,
            "/api/products/p1",
            Some(&token),
            Some(json!({ "name": "", "price": 0, "inventory": 0, "description": "" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["name"], "Performance Training Tee");
    assert_eq!(response.json["price"].as_f64(), Some(49.99));
    assert_eq!(response.json["inventory"], 0);
    assert_eq!(response.json["description"], "");
}

#[tokio::test]
async fn test_delete_missing_product_is_idempotent_and_audited() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let response = ctx
        .request(Method::DELETE, "/api/products/does-not-exist", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({ "success": true }));

    let log = ctx
        .request(Method::GET, "/api/audit-log", Some(&token), None)
        .await;
    let deletes: Vec<&Value> = log
        .json
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["action"] == "DELETE_PRODUCT")
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0]["details"]["productId"], "does-not-exist");
    assert!(deletes[0]["details"]["productName"].is_null());
}

#[tokio::test]
async fn test_bulk_delete_counts_existing_ids() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let response = ctx
        .request(
            Method::POST,
            "/api/products/bulk-delete",
            Some(&token),
            Some(json!({ "productIds": ["p1", "p2", "ghost"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({ "success": true, "deletedCount": 2 }));
    assert_eq!(ctx.get("/api/products").await.json.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_bulk_update_patches_matched_products() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let response = ctx
        .request(
            Method::POST,
            "/api/products/bulk-update",
            Some(&token),
            Some(json!({
                "productIds": ["p4", "p6"],
                "updates": { "category": "Gear", "inventory": "5" }
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["updatedCount"], 2);

    let gear = ctx.get("/api/products?category=Gear").await;
    assert_eq!(ids(&gear.json), vec!["p4", "p6"]);
    assert!(gear.json.as_array().unwrap().iter().all(|p| p["inventory"] == 5));
}

#[tokio::test]
async fn test_category_lifecycle() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let created = ctx
        .request(
            Method::POST,
            "/api/categories",
            Some(&token),
            Some(json!({ "name": "Recovery", "subcategories": ["Rollers"] })),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let id = created.json["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("cat"));

    let updated = ctx
        .request(
            Method::PUT,
            &format!("/api/categories/{id}"),
            Some(&token),
            Some(json!({ "description": "Mobility tools" })),
        )
        .await;
    assert_eq!(updated.json["name"], "Recovery");
    assert_eq!(updated.json["description"], "Mobility tools");

    let deleted = ctx
        .request(Method::DELETE, &format!("/api/categories/{id}"), Some(&token), None)
        .await;
    assert_eq!(deleted.json, json!({ "success": true }));

    let categories = ctx.get("/api/categories").await;
    assert_eq!(categories.json.as_array().unwrap().len(), 3);

    let missing = ctx
        .request(
            Method::PUT,
            &format!("/api/categories/{id}"),
            Some(&token),
            Some(json!({ "name": "Again" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json["error"], "Category not found");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/categories")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json["error"].is_string());
}
