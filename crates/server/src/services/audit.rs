//! Audit log.
//!
//! Entries are appended inside the same write as the mutation they
//! describe, so an action and its audit entry are persisted together.

use chrono::Utc;
use honor_culture_core::{AUDIT_LOG_CAPACITY, AuditAction, AuditEntry, AuditEntryId, Document};
use tracing::instrument;

use crate::store::{DocumentStore, unique_id};

/// Default number of entries returned by [`AuditService::recent`].
pub const DEFAULT_AUDIT_LIMIT: usize = 50;

/// Append an entry to `doc`, dropping the oldest beyond capacity.
pub fn append(doc: &mut Document, actor: &str, action: AuditAction, details: serde_json::Value) {
    let id = unique_id("log", |candidate| {
        doc.audit_log.iter().any(|e| e.id.as_str() == candidate)
    });

    doc.audit_log.push(AuditEntry {
        id: AuditEntryId::new(id),
        admin_id: actor.to_string(),
        action,
        details,
        timestamp: Utc::now(),
    });

    let overflow = doc.audit_log.len().saturating_sub(AUDIT_LOG_CAPACITY);
    if overflow > 0 {
        doc.audit_log.drain(..overflow);
    }
}

/// Read access to the audit log.
pub struct AuditService<'a> {
    store: &'a DocumentStore,
}

impl<'a> AuditService<'a> {
    /// Create a new audit service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// The most recent `limit` entries, newest first.
    ///
    /// `limit` is clamped to the log capacity.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        let limit = limit.min(AUDIT_LOG_CAPACITY);
        self.store
            .read(|doc| doc.audit_log.iter().rev().take(limit).cloned().collect())
            .await
    }
}
