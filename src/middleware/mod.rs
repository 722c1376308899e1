//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.

/// Access token middleware
pub mod auth;
