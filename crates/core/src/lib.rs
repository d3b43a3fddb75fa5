//! Honor Culture Core - Shared domain types.
//!
//! This crate provides the types shared by every Honor Culture component:
//! - `server` - Storefront and back-office JSON API
//! - `cli` - Operator tooling for the data file and admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no persistence.
//! Everything the store writes to disk is described here, so the document
//! layout can be read and checked without pulling in the server.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, closed status enums, lenient JSON helpers
//! - [`catalog`] - Products, variants, images and categories
//! - [`order`] - Orders and their frozen line items
//! - [`admin`] - Back-office accounts
//! - [`audit`] - Audit log entries
//! - [`document`] - The single JSON document holding all collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod audit;
pub mod catalog;
pub mod document;
pub mod order;
pub mod types;

pub use admin::Admin;
pub use audit::{AUDIT_LOG_CAPACITY, AuditEntry, SYSTEM_ACTOR};
pub use catalog::{Category, Product, ProductImage, ProductVariant, normalize_images};
pub use document::Document;
pub use order::{Order, OrderItem, PaymentSummary, ShippingInfo};
pub use types::*;
