//! Lifts a `token` field from JSON request bodies into the `Authorization`
//! header.
//!
//! The back-office UI sends its session token inside the body of write
//! requests. Moving it into the header lets a single extractor handle every
//! transport.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Largest body buffered to look for a token.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Middleware that copies a JSON body `token` into `Authorization: Bearer`.
///
/// Requests that already carry an `Authorization` header, are not JSON, or
/// use a method without a body pass through untouched.
pub async fn body_token_middleware(request: Request, next: Next) -> Response {
    if !wants_inspection(&request) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let Ok(bytes) = to_bytes(body, MAX_BODY_BYTES).await else {
        return AppError::PayloadTooLarge("Request body too large".to_string()).into_response();
    };

    if let Some(token) = token_from_json(&bytes) {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            parts.headers.insert(header::AUTHORIZATION, value);
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn wants_inspection(request: &Request) -> bool {
    let has_body_method = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    );
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    has_body_method && is_json && !request.headers().contains_key(header::AUTHORIZATION)
}

fn token_from_json(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value
        .get("token")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, http::HeaderMap, routing::post};
    use tower::ServiceExt;

    async fn echo(headers: HeaderMap, body: String) -> String {
        let auth = headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        format!("{auth}|{body}")
    }

    async fn send(request: Request) -> String {
        let app = Router::new()
            .route("/", post(echo))
            .layer(axum::middleware::from_fn(body_token_middleware));
        let response = app.oneshot(request).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_lifts_token_and_preserves_body() {
        let body = r#"{"token":"abc","name":"Tee"}"#;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        assert_eq!(send(request).await, format!("Bearer abc|{body}"));
    }

    #[tokio::test]
    async fn test_existing_header_wins() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, "Bearer header")
            .body(Body::from(r#"{"token":"body"}"#))
            .unwrap();

        assert!(send(request).await.starts_with("Bearer header|"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let app = Router::new()
            .route("/", post(echo))
            .layer(axum::middleware::from_fn(body_token_middleware));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(vec![b' '; MAX_BODY_BYTES + 1]))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_token_from_json_ignores_non_strings() {
        assert_eq!(token_from_json(br#"{"token": 42}"#), None);
        assert_eq!(token_from_json(b"not json"), None);
        assert_eq!(token_from_json(br#"{"token": " t "}"#).as_deref(), Some("t"));
    }
}
