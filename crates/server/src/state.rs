//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::audit::AuditService;
use crate::services::auth::{AuthService, SessionStore};
use crate::services::catalog::CatalogService;
use crate::services::notifications::NotificationDispatcher;
use crate::services::orders::OrderService;
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the single document
/// store handle, the session cache and the notification dispatcher.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: DocumentStore,
    sessions: SessionStore,
    notifications: NotificationDispatcher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `store` - Opened document store
    /// * `notifications` - Notification dispatcher
    #[must_use]
    pub fn new(
        config: ServerConfig,
        store: DocumentStore,
        notifications: NotificationDispatcher,
    ) -> Self {
        let sessions = SessionStore::new(config.session_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                sessions,
                notifications,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Get a reference to the session cache.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get a reference to the notification dispatcher.
    #[must_use]
    pub fn notifications(&self) -> &NotificationDispatcher {
        &self.inner.notifications
    }

    /// Catalog service over the shared store.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.store())
    }

    /// Order service over the shared store.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.store(), self.notifications())
    }

    /// Authentication service over the shared store and sessions.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store(), self.sessions())
    }

    /// Audit log reader.
    #[must_use]
    pub fn audit(&self) -> AuditService<'_> {
        AuditService::new(self.store())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("store", &self.inner.store.path())
            .field("sessions", &self.inner.sessions)
            .field("notifications", &self.inner.notifications)
            .finish()
    }
}
