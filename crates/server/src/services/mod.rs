//! Business logic services.
//!
//! Services borrow the shared [`DocumentStore`](crate::store::DocumentStore)
//! and are created per request from `AppState`.
//!
//! # Services
//!
//! - `auth` - Admin login, sessions and password hashing
//! - `audit` - Audit log append and read
//! - `catalog` - Products and categories
//! - `orders` - Checkout, order management, inventory alerts
//! - `contact` - Contact form validation
//! - `notifications` - Best-effort Telegram notifications

pub mod audit;
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod notifications;
pub mod orders;
