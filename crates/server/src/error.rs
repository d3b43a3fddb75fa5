//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Back-office errors use the body `{"error": "..."}`. Customer-facing
//! submissions (orders, the contact form) answer with
//! `{"success": false, "message": "..."}` so the storefront can show the
//! message as is.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::{REDACTED, redact_query};
use crate::services::auth::AuthError;
use crate::services::notifications::NotifyError;
use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or persisting the document failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Notification delivery failed.
    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, unknown or expired session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from a back-office client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body exceeds the buffering limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Customer-facing submission failed validation.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash | AuthError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Notify(NotifyError::NotConfigured) => StatusCode::BAD_REQUEST,
            Self::Notify(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() && !matches!(self, Self::Notify(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if matches!(self, Self::Notify(_)) {
            tracing::warn!(error = %self, "Notification error");
        }

        // Don't expose internal error details to clients
        let body = match self {
            Self::Store(_) | Self::Internal(_) => json!({ "error": "Internal server error" }),
            Self::Auth(AuthError::InvalidCredentials) => json!({ "error": "Invalid credentials" }),
            Self::Auth(_) => json!({ "error": "Internal server error" }),
            Self::Notify(err) => json!({ "success": false, "error": err.to_string() }),
            Self::NotFound(message)
            | Self::Unauthorized(message)
            | Self::BadRequest(message)
            | Self::PayloadTooLarge(message) => json!({ "error": message }),
            Self::Rejected(message) => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for an authenticated admin.
pub fn set_sentry_user(admin_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Strip session tokens from an event's request context before sending.
///
/// Used as the Sentry `before_send` hook.
#[must_use]
pub fn scrub_sentry_event(
    mut event: sentry::protocol::Event<'static>,
) -> Option<sentry::protocol::Event<'static>> {
    if let Some(request) = event.request.as_mut() {
        if let Some(url) = request.url.as_mut() {
            if let Some(query) = url.query().map(redact_query) {
                url.set_query(Some(&query));
            }
        }
        if let Some(query) = request.query_string.as_mut() {
            *query = redact_query(query);
        }
        if request.cookies.is_some() {
            request.cookies = Some(REDACTED.to_string());
        }
        for (name, value) in &mut request.headers {
            if name.eq_ignore_ascii_case("authorization") || name.eq_ignore_ascii_case("cookie") {
                *value = REDACTED.to_string();
            }
        }
    }
    Some(event)
}
