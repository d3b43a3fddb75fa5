//! The single JSON document holding every collection.

use serde::{Deserialize, Serialize};

use crate::admin::Admin;
use crate::audit::AuditEntry;
use crate::catalog::{Category, Product};
use crate::order::Order;

/// Entire persisted state.
///
/// Missing top-level keys deserialize as empty collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub admins: Vec<Admin>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,
}
