//! In-memory admin sessions keyed by opaque bearer tokens.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use honor_culture_core::{Admin, AdminId, AdminRole};
use moka::future::Cache;
use serde::Serialize;

/// Upper bound on concurrently live sessions.
const MAX_SESSIONS: u64 = 10_000;

/// Number of random bytes in a token.
const TOKEN_BYTES: usize = 32;

/// Identity bound to a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub admin_id: AdminId,
    pub username: String,
    pub role: AdminRole,
    pub expires_at: DateTime<Utc>,
}

/// Live sessions.
///
/// Tokens are 256-bit random values, base64url encoded. Entries expire after
/// the configured TTL; a process restart drops every session.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, AdminSession>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl SessionStore {
    /// Create an empty store whose sessions live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_live(ttl)
            .build();

        Self { cache, ttl }
    }

    /// Start a session for `admin` and return its token.
    pub async fn create(&self, admin: &Admin) -> (String, AdminSession) {
        let token = generate_token();
        let lifetime = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::hours(8));
        let session = AdminSession {
            admin_id: admin.id.clone(),
            username: admin.username.clone(),
            role: admin.role,
            expires_at: Utc::now() + lifetime,
        };

        self.cache.insert(token.clone(), session.clone()).await;
        (token, session)
    }

    /// Resolve a token to its session, if live.
    pub async fn get(&self, token: &str) -> Option<AdminSession> {
        let session = self.cache.get(token).await?;
        if session.expires_at <= Utc::now() {
            self.cache.invalidate(token).await;
            return None;
        }
        Some(session)
    }

    /// End the session for `token`, returning it if it was live.
    pub async fn revoke(&self, token: &str) -> Option<AdminSession> {
        self.cache.remove(token).await
    }
}

fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
