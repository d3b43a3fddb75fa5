//! Login, token transports, logout and the audit log.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use axum::http::{Method, StatusCode};
use honor_culture_core::AUDIT_LOG_CAPACITY;
use honor_culture_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_login_returns_opaque_token() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post("/api/auth", json!({ "username": "admin", "password": "admin123" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["success"], true);
    let token = response.json["token"].as_str().unwrap();
    assert_eq!(token.len(), 43);
    assert!(!token.starts_with("demo-token-"));
    assert!(response.json["expiresAt"].is_string());
    assert_eq!(response.json["admin"]["username"], "admin");
    assert_eq!(response.json["admin"]["role"], "super_admin");
    assert!(response.json["admin"].get("password").is_none());
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post("/api/auth", json!({ "username": "admin", "password": "nope" }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"], "Invalid credentials");

    let unknown = ctx
        .post("/api/auth", json!({ "username": "ghost", "password": "admin123" }))
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fabricated_demo_token_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .request(Method::GET, "/api/orders", Some("demo-token-1700000000000"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_token_accepted_from_query_and_body() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let by_query = ctx.get(&format!("/api/audit-log?token={token}")).await;
    assert_eq!(by_query.status, StatusCode::OK);

    let by_body = ctx
        .post(
            "/api/categories",
            json!({ "token": token, "name": "Outdoor" }),
        )
        .await;
    assert_eq!(by_body.status, StatusCode::OK, "{}", by_body.text);
    assert_eq!(by_body.json["name"], "Outdoor");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let logout = ctx
        .request(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(logout.json, json!({ "success": true }));

    let after = ctx.request(Method::GET, "/api/orders", Some(&token), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let again = ctx
        .request(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_logout_are_audited() {
    let ctx = TestContext::new().await;
    let first = ctx.login().await;
    ctx.request(Method::POST, "/api/auth/logout", Some(&first), None)
        .await;
    let token = ctx.login().await;

    let log = ctx
        .request(Method::GET, "/api/audit-log", Some(&token), None)
        .await;
    let actions: Vec<&str> = log
        .json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["LOGIN", "LOGOUT", "LOGIN"]);
    assert!(log.json.as_array().unwrap().iter().all(|e| e["adminId"] == "admin1"));
}

#[tokio::test]
async fn test_audit_log_limit() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    for n in 0..3 {
        ctx.request(
            Method::DELETE,
            &format!("/api/products/ghost{n}"),
            Some(&token),
            None,
        )
        .await;
    }

    let limited = ctx
        .request(Method::GET, "/api/audit-log?limit=2", Some(&token), None)
        .await;
    assert_eq!(limited.json.as_array().unwrap().len(), 2);
    assert_eq!(limited.json[0]["details"]["productId"], "ghost2");

    let invalid = ctx
        .request(Method::GET, "/api/audit-log?limit=many", Some(&token), None)
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_log_is_capped() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let ids: Vec<String> = (0..=AUDIT_LOG_CAPACITY).map(|n| format!("ghost{n}")).collect();

    for id in &ids {
        let response = ctx
            .request(Method::DELETE, &format!("/api/products/{id}"), Some(&token), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let log = ctx
        .request(Method::GET, "/api/audit-log?limit=5000", Some(&token), None)
        .await;
    let entries = log.json.as_array().unwrap();
    assert_eq!(entries.len(), AUDIT_LOG_CAPACITY);
    assert_eq!(entries[0]["details"]["productId"], format!("ghost{AUDIT_LOG_CAPACITY}"));
    // The login and the first delete fell off the end.
    assert_eq!(entries[AUDIT_LOG_CAPACITY - 1]["details"]["productId"], "ghost1");
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_query_token_is_redacted_in_request_logs() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let logs = LogCapture::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let response = ctx.get(&format!("/api/orders?token={token}")).await;
    assert_eq!(response.status, StatusCode::OK);

    let output = logs.contents();
    assert!(output.contains("uri=/api/orders?token=[REDACTED]"));
    assert!(!output.contains(&token));
}
