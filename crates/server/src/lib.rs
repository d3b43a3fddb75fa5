//! Honor Culture store server library.
//!
//! The storefront and back-office JSON API as a library, so the router can
//! be driven in-process by tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
