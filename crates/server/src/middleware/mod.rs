//! HTTP middleware.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (record in span, echo in response)
//! 4. CORS
//! 5. Body token (lift JSON `token` into `Authorization`)
//!
//! [`RequireAdmin`] then resolves the token inside protected handlers.

pub mod auth;
pub mod body_token;
pub mod request_id;

pub use auth::{REDACTED, RequireAdmin, redact_query, redacted_uri, token_from_parts};
pub use body_token::body_token_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
