//! CLI command implementations.

pub mod admin;
pub mod audit;
pub mod store;
