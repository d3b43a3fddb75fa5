//! Admin authentication extractor.
//!
//! A session token is read from, in order:
//! 1. `Authorization: Bearer <token>`
//! 2. the `token` query parameter
//!
//! JSON bodies carrying a `token` field are handled earlier by
//! [`body_token_middleware`](super::body_token_middleware), which moves the
//! value into the `Authorization` header.

use axum::{
    extract::{FromRequestParts, Query},
    http::{Uri, header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use tracing::Span;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::AdminSession;
use crate::state::AppState;

/// Extractor that requires a live admin session.
///
/// Rejects with `401 {"error": "Unauthorized"}` when the token is missing,
/// unknown or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(admin: RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.session.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    /// The resolved session.
    pub session: AdminSession,
    /// The token that resolved it.
    pub token: String,
}

impl RequireAdmin {
    /// Actor id recorded in audit entries.
    #[must_use]
    pub fn actor(&self) -> &str {
        self.session.admin_id.as_str()
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Read the session token from the request head.
#[must_use]
pub fn token_from_parts(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from);

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.token)
            .filter(|token| !token.is_empty())
    })
}

/// Placeholder written over session tokens in logs and error reports.
pub const REDACTED: &str = "[REDACTED]";

/// Replace the value of any `token` pair in a query string.
///
/// Other pairs are kept byte for byte.
#[must_use]
pub fn redact_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| {
            let is_token = url::form_urlencoded::parse(pair.as_bytes())
                .next()
                .is_some_and(|(key, _)| key == "token");
            if is_token {
                format!("token={REDACTED}")
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Path and query of `uri` with the session token redacted.
#[must_use]
pub fn redacted_uri(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}?{}", uri.path(), redact_query(query)),
        None => uri.path().to_string(),
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || AppError::Unauthorized("Unauthorized".to_string());

        let token = token_from_parts(parts).ok_or_else(unauthorized)?;
        let session = state
            .auth()
            .authenticate(&token)
            .await
            .ok_or_else(unauthorized)?;

        Span::current().record("admin_id", session.admin_id.as_str());
        set_sentry_user(&session.admin_id, &session.username);

        Ok(Self { session, token })
    }
}
