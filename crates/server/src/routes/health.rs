//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    "ok"
}

/// Readiness check: fails while the last persist attempt failed.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.store().is_healthy() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
    }
}
