//! # tickoff API Server Library
//!
//! This library provides the core functionality for the tickoff API server:
//! account registration and login with cookie-carried tokens, and per-user
//! todo lists guarded by ownership checks.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
