//! Client for the external game metadata database.
//!
//! Used to auto-fill descriptions, release years, covers, multiplayer flags and
//! genres when games are imported into the library.

pub mod client;
pub mod matching;
pub mod models;
pub mod token;

#[cfg(test)]
pub mod mock_server;

pub use client::MetadataClient;

/// Errors raised while talking to the metadata API.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not obtain access token: {0}")]
    Token(String),

    /// Non-success status from the games endpoint.
    #[error("Metadata API returned status {0}")]
    Status(u16),

    #[error("Unreadable metadata response: {0}")]
    Decode(String),

    #[error("Invalid metadata URL: {0}")]
    InvalidUrl(String),
}
