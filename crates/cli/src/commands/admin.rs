//! Admin account helpers.
//!
//! # Usage
//!
//! ```bash
//! hc-cli admin hash-password 's3cret'
//! ```
//!
//! Paste the printed hash into the admin's `password` field in the document.

use honor_culture_server::services::auth::{self, AuthError};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// Hash `password` with Argon2id and log the PHC string.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: SecretString) -> Result<(), AuthError> {
    let hash = auth::hash_password(password.expose_secret())?;
    info!(%hash, "Password hashed");
    Ok(())
}
