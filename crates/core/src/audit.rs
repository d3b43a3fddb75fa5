//! Audit log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AuditAction, AuditEntryId};

/// Maximum number of audit entries kept in the document.
///
/// Appending beyond this drops the oldest entries.
pub const AUDIT_LOG_CAPACITY: usize = 1000;

/// Actor recorded for entries not caused by a logged-in admin.
pub const SYSTEM_ACTOR: &str = "system";

/// One recorded administrative action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    /// Admin id, or [`SYSTEM_ACTOR`].
    pub admin_id: String,
    pub action: AuditAction,
    #[serde(default)]
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
