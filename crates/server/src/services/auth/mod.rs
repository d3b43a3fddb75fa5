//! Back-office authentication service.
//!
//! Verifies admin credentials against the document and issues opaque
//! session tokens. Passwords are stored as Argon2id PHC strings; an account
//! still holding a plaintext password from an older data file is accepted
//! once and re-hashed in the same write.

mod error;
mod session;

pub use error::AuthError;
pub use session::{AdminSession, SessionStore};

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use honor_culture_core::{Admin, AdminId, AdminRole, AuditAction};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::services::audit;
use crate::store::DocumentStore;

/// Public view of an admin account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: AdminId,
    pub username: String,
    pub role: AdminRole,
    pub email: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id.clone(),
            username: admin.username.clone(),
            role: admin.role,
            email: admin.email.clone(),
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub session: AdminSession,
    pub admin: AdminProfile,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a DocumentStore,
    sessions: &'a SessionStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore, sessions: &'a SessionStore) -> Self {
        Self { store, sessions }
    }

    /// Verify credentials and start a session.
    ///
    /// Records a `LOGIN` audit entry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown username or a
    /// wrong password, or `AuthError::Store` if the audit entry cannot be
    /// persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let admin = self
            .store
            .read(|doc| doc.admins.iter().find(|a| a.username == username).cloned())
            .await;
        let Some(admin) = admin else {
            // Same argon2 cost as a real account
            verify_dummy(password);
            return Err(AuthError::InvalidCredentials);
        };

        let upgraded_hash = check_password(password, &admin.password)?;
        if upgraded_hash.is_some() {
            warn!(admin_id = %admin.id, "Upgrading plaintext password to argon2 hash");
        }

        self.store
            .write(|doc| {
                if let Some(hash) = upgraded_hash {
                    if let Some(stored) = doc.admins.iter_mut().find(|a| a.id == admin.id) {
                        stored.password = hash;
                    }
                }
                audit::append(
                    doc,
                    admin.id.as_str(),
                    AuditAction::Login,
                    json!({ "username": admin.username }),
                );
                Ok::<_, AuthError>(())
            })
            .await?;

        let (token, session) = self.sessions.create(&admin).await;
        info!(admin_id = %admin.id, role = %admin.role, "Admin logged in");

        Ok(LoginOutcome {
            token,
            session,
            admin: AdminProfile::from(&admin),
        })
    }

    /// Resolve a bearer token to its live session.
    pub async fn authenticate(&self, token: &str) -> Option<AdminSession> {
        self.sessions.get(token).await
    }

    /// End the session for `token`.
    ///
    /// Records a `LOGOUT` audit entry when the token was live.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the audit entry cannot be persisted.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<Option<AdminSession>, AuthError> {
        let Some(session) = self.sessions.revoke(token).await else {
            return Ok(None);
        };

        self.store
            .write(|doc| {
                audit::append(
                    doc,
                    session.admin_id.as_str(),
                    AuditAction::Logout,
                    json!({ "username": session.username }),
                );
                Ok::<_, AuthError>(())
            })
            .await?;

        info!(admin_id = %session.admin_id, "Admin logged out");
        Ok(Some(session))
    }
}

/// Whether `stored` is a PHC-format Argon2 hash rather than plaintext.
#[must_use]
pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Hash checked when the username is unknown.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("honor-culture-unknown-admin").ok());

/// Run a verification that always fails.
fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Check `password` against the stored value.
///
/// Returns a fresh hash when the stored value was legacy plaintext and
/// matched, so the caller can replace it.
fn check_password(password: &str, stored: &str) -> Result<Option<String>, AuthError> {
    if is_password_hash(stored) {
        verify_password(password, stored)?;
        return Ok(None);
    }

    if stored.is_empty() || stored != password {
        return Err(AuthError::InvalidCredentials);
    }

    hash_password(password).map(Some)
}
