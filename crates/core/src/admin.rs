//! Back-office accounts.

use serde::{Deserialize, Serialize};

use crate::types::{AdminId, AdminRole};

/// A back-office account.
///
/// Accounts are provisioned with the CLI; the API never creates them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    /// Argon2 PHC string. Plaintext values from older files are upgraded on
    /// the first successful login.
    pub password: String,
    pub role: AdminRole,
    pub email: String,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("email", &self.email)
            .finish()
    }
}
