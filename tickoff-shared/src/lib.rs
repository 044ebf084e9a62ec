//! # tickoff shared library
//!
//! Types and logic used by the tickoff API server.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, identity tokens, the auth gate, ownership checks
//! - `models`: users and todos
//! - `store`: persistence traits with PostgreSQL and in-memory back-ends
//! - `db`: PostgreSQL pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the tickoff shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
