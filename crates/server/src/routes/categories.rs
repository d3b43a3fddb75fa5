//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use honor_culture_core::{Category, CategoryId};
use serde_json::{Value, json};
use tracing::instrument;

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::catalog::CategoryInput;
use crate::state::AppState;

/// Category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{id}", put(update).delete(destroy))
}

/// List categories.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().list_categories().await)
}

/// Create a category.
#[instrument(skip_all, fields(admin_id = %admin.actor()))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<Category>> {
    let category = state.catalog().create_category(input, admin.actor()).await?;
    Ok(Json(category))
}

/// Update a category.
#[instrument(skip(state, admin, input), fields(admin_id = %admin.actor()))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<CategoryId>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<Category>> {
    let category = state
        .catalog()
        .update_category(&id, input, admin.actor())
        .await?;
    Ok(Json(category))
}

/// Delete a category.
#[instrument(skip(state, admin), fields(admin_id = %admin.actor()))]
pub async fn destroy(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    state.catalog().delete_category(&id, admin.actor()).await?;
    Ok(Json(json!({ "success": true })))
}
