//! Honor Culture store server.
//!
//! Serves the storefront and back-office JSON API on port 5000 by default.
//!
//! # Architecture
//!
//! - Axum web framework with Tower middleware
//! - One JSON document store opened at start-up and flushed on shutdown
//! - Opaque admin session tokens held in memory
//! - Best-effort Telegram notifications
//!
//! # Configuration
//!
//! Environment variables (see `config.rs` for the full list):
//! - `HONOR_DATA_FILE` - Path of the JSON document (default `data.json`)
//! - `HONOR_PORT` - Listen port (default 5000)
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID` - Enable notifications
//! - `SENTRY_DSN` - Enable error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use honor_culture_server::config::{LogFormat, ServerConfig};
use honor_culture_server::error::scrub_sentry_event;
use honor_culture_server::routes;
use honor_culture_server::services::notifications::NotificationDispatcher;
use honor_culture_server::state::AppState;
use honor_culture_server::store::DocumentStore;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
/// If `SENTRY_DSN` is not configured, returns `None` and Sentry is disabled.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            before_send: Some(std::sync::Arc::new(scrub_sentry_event)),
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber: `EnvFilter`, text or JSON output, Sentry.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "honor_culture_server=info,tower_http=debug".into());

    let text = (format == LogFormat::Text).then(tracing_subscriber::fmt::layer);
    let json = (format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text)
        .with(json)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let store = DocumentStore::open(&config.data_file)
        .await
        .expect("Failed to open document store");
    tracing::info!(path = %config.data_file.display(), "Document store opened");

    let notifications = NotificationDispatcher::from_config(config.telegram.as_ref())
        .expect("Failed to initialize notifications");
    if !notifications.is_configured() {
        tracing::warn!("Telegram is not configured; notifications are disabled");
    }

    let addr = config.socket_addr();
    let state = AppState::new(config, store, notifications);
    let app = routes::app(state.clone());

    tracing::info!("Server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    if let Err(e) = state.store().flush().await {
        tracing::error!(error = %e, "Failed to flush document store on shutdown");
    }
    tracing::info!("Server stopped");
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
