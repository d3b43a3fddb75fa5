//! Notification errors.

use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No notifier is configured.
    #[error("Telegram chat ID not configured")]
    NotConfigured,

    /// Building the HTTP client failed.
    #[error("Notifier setup failed: {0}")]
    Setup(String),

    /// HTTP request failed before a response arrived.
    #[error("Notification request failed: {0}")]
    Request(String),

    /// The messaging API rejected the message.
    #[error("Notification rejected ({status}): {description}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Error description returned by the API.
        description: String,
    },
}
