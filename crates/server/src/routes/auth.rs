//! Back-office login and logout.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use super::ApiJson;
use crate::error::{Result, clear_sentry_user};
use crate::middleware::RequireAdmin;
use crate::services::auth::AdminProfile;
use crate::state::AppState;

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(login))
        .route("/auth/logout", post(logout))
}

/// Login body.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminProfile,
}

/// Verify credentials and issue a session token.
#[instrument(skip_all, fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = state
        .auth()
        .login(request.username.trim(), &request.password)
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token: outcome.token,
        expires_at: outcome.session.expires_at,
        admin: outcome.admin,
    }))
}

/// Revoke the caller's session token.
#[instrument(skip_all, fields(admin_id = %admin.actor()))]
pub async fn logout(State(state): State<AppState>, admin: RequireAdmin) -> Result<Json<Value>> {
    state.auth().logout(&admin.token).await?;
    clear_sentry_user();
    Ok(Json(json!({ "success": true })))
}
