//! Audit log reader.
//!
//! # Usage
//!
//! ```bash
//! hc-cli audit tail --limit 20
//! ```

use std::path::Path;

use honor_culture_server::services::audit::AuditService;
use honor_culture_server::store::{DocumentStore, StoreError, load_document};
use tracing::info;

/// Log the `limit` most recent audit entries, newest first.
///
/// # Errors
///
/// Returns a store error if the document is missing, unreadable or
/// malformed.
pub async fn tail(path: &Path, limit: usize) -> Result<(), StoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = DocumentStore::from_document(path, load_document(path, &bytes)?);
    let entries = AuditService::new(&store).recent(limit).await;

    if entries.is_empty() {
        info!("Audit log is empty");
    }
    for entry in entries {
        info!(
            timestamp = %entry.timestamp,
            admin_id = %entry.admin_id,
            action = %entry.action,
            details = %entry.details,
            "{}",
            entry.id
        );
    }
    Ok(())
}
