//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness
//! GET  /health/ready                 - Readiness (last persist succeeded)
//!
//! # Catalog (reads public, writes need a session)
//! GET    /api/products               - List, filter by category/minPrice/maxPrice
//! GET    /api/products/{id}          - Product detail
//! POST   /api/products               - Create product
//! PUT    /api/products/{id}          - Partial update
//! DELETE /api/products/{id}          - Delete (idempotent)
//! POST   /api/products/bulk-delete   - Delete by id set
//! POST   /api/products/bulk-update   - Patch by id set
//! GET    /api/categories             - List categories
//! POST   /api/categories             - Create category
//! PUT    /api/categories/{id}        - Update category
//! DELETE /api/categories/{id}        - Delete category
//!
//! # Back office (session)
//! GET  /api/inventory/alerts         - Low and out-of-stock products
//! GET  /api/audit-log                - Recent admin actions
//! GET  /api/orders                   - All orders, newest first
//! GET  /api/orders/{id}              - Order detail
//! PUT  /api/orders/{id}              - Update order status
//!
//! # Auth
//! POST /api/auth                     - Login, returns a session token
//! POST /api/auth/logout              - Revoke the session token
//!
//! # Storefront
//! POST /api/orders                   - Place order
//! POST /api/form-submit              - Contact form
//! GET  /api/telegram-test            - Notifier smoke test
//! ```

pub mod audit;
pub mod auth;
pub mod categories;
pub mod forms;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;

use std::str::FromStr;

use axum::{
    Router,
    extract::FromRequest,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::{Span, warn};

use crate::error::AppError;
use crate::middleware::{
    REQUEST_ID_HEADER, body_token_middleware, redacted_uri, request_id_middleware,
};
use crate::state::AppState;

/// JSON body extractor whose rejection is an [`AppError`].
///
/// Malformed bodies answer `400 {"error": ...}` like every other client error.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Parse an optional query value, treating blank as absent.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming `field` when the value is present
/// but does not parse.
pub fn parse_query_value<T: FromStr>(
    value: Option<&str>,
    field: &str,
) -> Result<Option<T>, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::BadRequest(format!("Invalid {field}")))
        })
        .transpose()
}

/// All `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(categories::routes())
        .merge(inventory::routes())
        .merge(audit::routes())
        .merge(auth::routes())
        .merge(orders::routes())
        .merge(forms::routes())
}

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(axum::middleware::from_fn(body_token_middleware))
        .layer(cors)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %redacted_uri(request.uri()),
                        request_id = tracing::field::Empty,
                        admin_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}
