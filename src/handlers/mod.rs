//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, query string)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Friend and ownership endpoints
pub mod friends;
/// Library catalog endpoints
pub mod games;
/// Service health endpoint
pub mod health;
/// Metadata search endpoint
pub mod metadata;
/// Platform endpoints
pub mod platforms;
/// Play-next queue endpoints
pub mod shortlist;
/// Tag endpoints
pub mod tags;
