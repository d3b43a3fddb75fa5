//! Document initialisation and checks.
//!
//! # Usage
//!
//! ```bash
//! hc-cli store init [--force]
//! hc-cli store check
//! ```

use std::path::{Path, PathBuf};

use honor_culture_server::services::auth::is_password_hash;
use honor_culture_server::store::{StoreError, load_document, persist, seed_document};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from store commands.
#[derive(Debug, Error)]
pub enum StoreCommandError {
    /// Refusing to overwrite without `--force`.
    #[error("Document already exists at {0}. Use --force to overwrite")]
    AlreadyExists(PathBuf),

    /// Nothing to check.
    #[error("Document not found at {0}. Run 'hc-cli store init' first")]
    NotFound(PathBuf),

    /// Reading the file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loading, seeding or persisting failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Write the seed document to `path`.
///
/// # Errors
///
/// Returns `StoreCommandError::AlreadyExists` when the file exists and
/// `force` is false, or a store error if seeding or writing fails.
pub async fn init(path: &Path, force: bool) -> Result<(), StoreCommandError> {
    if !force && tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(StoreCommandError::AlreadyExists(path.to_path_buf()));
    }

    let doc = seed_document()?;
    persist(path, &doc).await?;

    info!(
        path = %path.display(),
        products = doc.products.len(),
        categories = doc.categories.len(),
        admins = doc.admins.len(),
        "Seed document written"
    );
    Ok(())
}

/// Parse the document at `path` and report collection sizes.
///
/// Admins whose password is still stored in plaintext are reported; the
/// server re-hashes them on their next login.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub async fn check(path: &Path) -> Result<(), StoreCommandError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreCommandError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(StoreCommandError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let doc = load_document(path, &bytes)?;

    info!(
        path = %path.display(),
        products = doc.products.len(),
        categories = doc.categories.len(),
        admins = doc.admins.len(),
        orders = doc.orders.len(),
        audit_entries = doc.audit_log.len(),
        "Document is valid"
    );

    for admin in doc.admins.iter().filter(|a| !is_password_hash(&a.password)) {
        warn!(username = %admin.username, "Admin password is stored in plaintext");
    }
    Ok(())
}
