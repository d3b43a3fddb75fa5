//! Product route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use honor_culture_core::{Product, ProductId};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{ApiJson, parse_query_value};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::catalog::{ProductFilter, ProductInput};
use crate::state::AppState;

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/bulk-delete", post(bulk_delete))
        .route("/products/bulk-update", post(bulk_update))
        .route("/products/{id}", get(show).put(update).delete(destroy))
}

/// Query parameters for the product list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ProductsQuery {
    fn into_filter(self) -> Result<ProductFilter> {
        Ok(ProductFilter {
            min_price: parse_query_value(self.min_price.as_deref(), "minPrice")?,
            max_price: parse_query_value(self.max_price.as_deref(), "maxPrice")?,
            category: self.category,
        })
    }
}

/// Bulk delete body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub product_ids: Vec<ProductId>,
}

/// Bulk update body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub product_ids: Vec<ProductId>,
    pub updates: ProductInput,
}

/// List products, optionally filtered.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query.into_filter()?;
    Ok(Json(state.catalog().list_products(&filter).await))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().get_product(&id).await?))
}

/// Create a product.
#[instrument(skip_all, fields(admin_id = %admin.actor()))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Product>> {
    let product = state.catalog().create_product(input, admin.actor()).await?;
    Ok(Json(product))
}

/// Partially update a product.
#[instrument(skip(state, admin, input), fields(admin_id = %admin.actor()))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Product>> {
    let product = state
        .catalog()
        .update_product(&id, &input, admin.actor())
        .await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state, admin), fields(admin_id = %admin.actor()))]
pub async fn destroy(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    state.catalog().delete_product(&id, admin.actor()).await?;
    Ok(Json(json!({ "success": true })))
}

/// Delete every listed product.
#[instrument(skip_all, fields(admin_id = %admin.actor()))]
pub async fn bulk_delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ApiJson(request): ApiJson<BulkDeleteRequest>,
) -> Result<Json<Value>> {
    let deleted = state
        .catalog()
        .bulk_delete(&request.product_ids, admin.actor())
        .await?;
    Ok(Json(json!({ "success": true, "deletedCount": deleted })))
}

/// Patch every listed product.
#[instrument(skip_all, fields(admin_id = %admin.actor()))]
pub async fn bulk_update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ApiJson(request): ApiJson<BulkUpdateRequest>,
) -> Result<Json<Value>> {
    let updated = state
        .catalog()
        .bulk_update(&request.product_ids, &request.updates, admin.actor())
        .await?;
    Ok(Json(json!({ "success": true, "updatedCount": updated })))
}
