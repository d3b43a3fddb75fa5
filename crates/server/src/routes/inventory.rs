//! Inventory alert route.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use super::parse_query_value;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::orders::InventoryAlerts;
use crate::state::AppState;

/// Inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/inventory/alerts", get(alerts))
}

/// Query parameters for inventory alerts.
#[derive(Debug, Default, Deserialize)]
pub struct AlertsQuery {
    pub threshold: Option<String>,
}

/// Low-stock and out-of-stock products.
///
/// `threshold` defaults to the configured low-stock threshold.
#[instrument(skip(state, _admin))]
pub async fn alerts(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<InventoryAlerts>> {
    let threshold = parse_query_value(query.threshold.as_deref(), "threshold")?
        .unwrap_or(state.config().low_stock_threshold);

    Ok(Json(state.orders().inventory_alerts(threshold).await))
}
