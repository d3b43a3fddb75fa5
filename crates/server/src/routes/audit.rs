//! Audit log route.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use honor_culture_core::AuditEntry;
use serde::Deserialize;
use tracing::instrument;

use super::parse_query_value;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::audit::DEFAULT_AUDIT_LIMIT;
use crate::state::AppState;

/// Audit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit-log", get(recent))
}

/// Query parameters for the audit log.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<String>,
}

/// Most recent audit entries, newest first.
#[instrument(skip(state, _admin))]
pub async fn recent(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>> {
    let limit = parse_query_value(query.limit.as_deref(), "limit")?.unwrap_or(DEFAULT_AUDIT_LIMIT);
    Ok(Json(state.audit().recent(limit).await))
}
