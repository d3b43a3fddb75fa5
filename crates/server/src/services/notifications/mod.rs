//! Outbound notifications for orders and contact form submissions.
//!
//! Delivery is best-effort: [`NotificationDispatcher::dispatch`] spawns the
//! send and returns immediately, logging any failure. Only the smoke test
//! endpoint awaits delivery through [`NotificationDispatcher::send_now`].

mod error;
pub mod messages;
mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use error::NotifyError;
pub use telegram::TelegramNotifier;

use crate::config::TelegramConfig;

/// A channel that can deliver a plain text message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the message was not accepted.
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Routes messages to the configured notifier, if any.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl NotificationDispatcher {
    /// Wrap an explicit notifier.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// A dispatcher that drops every message.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build from optional Telegram settings.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the HTTP client cannot be built.
    pub fn from_config(config: Option<&TelegramConfig>) -> Result<Self, NotifyError> {
        match config {
            Some(config) => Ok(Self::new(Arc::new(TelegramNotifier::new(config)?))),
            None => Ok(Self::disabled()),
        }
    }

    /// Whether a notifier is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.notifier.is_some()
    }

    /// Send `message` in the background.
    ///
    /// Never blocks the caller and never reports failure; errors are logged
    /// with the `event` label.
    pub fn dispatch(&self, event: &'static str, message: String) {
        let Some(notifier) = self.notifier.clone() else {
            debug!(event, "Notifications not configured, skipping");
            return;
        };

        tokio::spawn(async move {
            match notifier.notify(&message).await {
                Ok(()) => debug!(event, "Notification delivered"),
                Err(e) => warn!(event, error = %e, "Notification delivery failed"),
            }
        });
    }

    /// Send `message` and wait for the outcome.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::NotConfigured` when no notifier is set, or the
    /// notifier's own error.
    pub async fn send_now(&self, message: &str) -> Result<(), NotifyError> {
        let notifier = self.notifier.as_ref().ok_or(NotifyError::NotConfigured)?;
        notifier.notify(message).await
    }
}
