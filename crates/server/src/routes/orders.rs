//! Order route handlers.
//!
//! Placing an order is public; reading and updating orders needs a session.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use honor_culture_core::{Order, OrderId};
use serde::Serialize;
use tracing::instrument;

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::orders::{OrderRequest, OrderUpdate};
use crate::state::AppState;

/// Order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(place))
        .route("/orders/{id}", get(show).put(update))
}

/// Response to a placed order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub message: &'static str,
    pub order_id: OrderId,
    pub order: Order,
}

/// Place an order from the storefront checkout.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OrderRequest>,
) -> Result<Json<PlaceOrderResponse>> {
    let order = state.orders().place_order(request).await?;

    Ok(Json(PlaceOrderResponse {
        success: true,
        message: "Order placed successfully",
        order_id: order.id.clone(),
        order,
    }))
}

/// All orders, newest first.
#[instrument(skip_all, fields(admin_id = %admin.actor()))]
pub async fn list(State(state): State<AppState>, admin: RequireAdmin) -> Json<Vec<Order>> {
    Json(state.orders().list_orders().await)
}

/// Order detail.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders().get_order(&id).await?))
}

/// Update an order's status.
#[instrument(skip(state, admin, update), fields(admin_id = %admin.actor()))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<OrderId>,
    ApiJson(update): ApiJson<OrderUpdate>,
) -> Result<Json<Order>> {
    let order = state
        .orders()
        .update_order(&id, update, admin.actor())
        .await?;
    Ok(Json(order))
}
