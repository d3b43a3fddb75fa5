//! Contact form and notifier smoke test.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::ApiJson;
use crate::error::Result;
use crate::services::contact::ContactSubmission;
use crate::services::notifications::messages;
use crate::state::AppState;

/// Form routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/form-submit", post(submit))
        .route("/telegram-test", get(telegram_test))
}

/// Validate a contact form and relay it to the notifier.
///
/// Delivery is best-effort; the response does not wait for it.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<ContactSubmission>,
) -> Result<Json<Value>> {
    let form = submission.validate()?;
    info!(email_domain = form.email.domain(), "Contact form submitted");

    state
        .notifications()
        .dispatch("contact_form", messages::contact_form(&form, Utc::now()));

    Ok(Json(
        json!({ "success": true, "message": "Form submitted successfully" }),
    ))
}

/// Send a test message and report whether it was delivered.
#[instrument(skip_all)]
pub async fn telegram_test(State(state): State<AppState>) -> Result<Json<Value>> {
    state
        .notifications()
        .send_now(&messages::smoke_test(Utc::now()))
        .await?;
    Ok(Json(json!({ "success": true })))
}
