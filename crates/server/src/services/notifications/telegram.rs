//! Telegram Bot API notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use url::Url;

use super::{Notifier, NotifyError};
use crate::config::TelegramConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends messages to one chat through the `sendMessage` method.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: Url,
    bot_token: SecretString,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base.as_str())
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// Create a notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Setup` if the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.as_str().trim_end_matches('/'),
            self.bot_token.expose_secret()
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[instrument(skip(self, message), fields(chat_id = %self.chat_id, len = message.len()))]
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: message,
            })
            .send()
            .await
            // The URL carries the bot token
            .map_err(|e| NotifyError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Request(e.without_url().to_string()))?;

        if let Err(e) = check_response(status, &body) {
            error!(error = %e, "Telegram API error");
            return Err(e);
        }

        debug!("Message sent to Telegram");
        Ok(())
    }
}

/// Map a `sendMessage` reply to success or `NotifyError::Api`.
///
/// The status is checked first; a proxy error page is not JSON.
fn check_response(status: StatusCode, body: &str) -> Result<(), NotifyError> {
    let parsed = serde_json::from_str::<ApiResponse>(body).ok();
    if status.is_success() && parsed.as_ref().is_some_and(|reply| reply.ok) {
        return Ok(());
    }

    let description = parsed
        .and_then(|reply| reply.description)
        .or_else(|| status.canonical_reason().map(String::from))
        .unwrap_or_else(|| "Unknown error".to_string());
    Err(NotifyError::Api {
        status: status.as_u16(),
        description,
    })
}
