//! Closed enums for order status, admin roles and audit actions.
//!
//! All three were free-text strings in older data files. They are parsed at
//! the boundary so an unknown value is rejected instead of stored.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Serialized with the capitalised names the back-office dropdown shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Display name as stored in the document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to all back-office features.
    SuperAdmin,
    /// Catalog and order management.
    ProductManager,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::ProductManager => write!(f, "product_manager"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "product_manager" => Ok(Self::ProductManager),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// Administrative action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Login,
    Logout,
    AddProduct,
    UpdateProduct,
    DeleteProduct,
    BulkDeleteProducts,
    BulkUpdateProducts,
    AddCategory,
    UpdateCategory,
    DeleteCategory,
    OrderCreated,
    UpdateOrder,
}

impl AuditAction {
    /// Wire tag as stored in the document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::AddProduct => "ADD_PRODUCT",
            Self::UpdateProduct => "UPDATE_PRODUCT",
            Self::DeleteProduct => "DELETE_PRODUCT",
            Self::BulkDeleteProducts => "BULK_DELETE_PRODUCTS",
            Self::BulkUpdateProducts => "BULK_UPDATE_PRODUCTS",
            Self::AddCategory => "ADD_CATEGORY",
            Self::UpdateCategory => "UPDATE_CATEGORY",
            Self::DeleteCategory => "DELETE_CATEGORY",
            Self::OrderCreated => "ORDER_CREATED",
            Self::UpdateOrder => "UPDATE_ORDER",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
