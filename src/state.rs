//! Shared application state handed to every handler.

use std::sync::Arc;

use axum::extract::FromRef;
use sha2::{Digest, Sha256};

use crate::{db::DbPool, metadata::MetadataClient};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,

    /// Absent when no metadata credentials are configured
    pub metadata: Option<Arc<MetadataClient>>,

    /// SHA-256 of the configured access token, hex encoded
    pub api_token_hash: Option<String>,
}

impl AppState {
    pub fn new(pool: DbPool, metadata: Option<MetadataClient>, api_token: Option<&str>) -> Self {
        Self {
            pool,
            metadata: metadata.map(Arc::new),
            api_token_hash: api_token.map(hash_token),
        }
    }

    pub fn metadata(&self) -> Option<&MetadataClient> {
        self.metadata.as_deref()
    }
}

/// Lets handlers that only need the database keep extracting `State<DbPool>`.
impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
