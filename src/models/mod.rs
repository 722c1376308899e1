//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies of the HTTP API.

/// Friends and the games they own
pub mod friend;
/// Library games and their filters
pub mod game;
/// Platforms and launchers
pub mod platform;
/// Play-next queue
pub mod shortlist;
/// User-defined tags
pub mod tag;
