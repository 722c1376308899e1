//! Metadata search endpoint, used by clients to preview matches before importing.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    services::import_service::{self, MetadataCandidate},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MetadataSearchQuery {
    pub q: String,
}

/// Search the metadata database.
///
/// # Response (200 OK)
///
/// Candidates ordered by edit distance to `q`, closest first:
///
/// ```json
/// [
///   { "distance": 0, "similarity": 1.0, "id": 113112, "name": "Hades", ... }
/// ]
/// ```
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<MetadataSearchQuery>,
) -> Result<Json<Vec<MetadataCandidate>>, AppError> {
    let candidates = import_service::search_metadata(state.metadata(), &query.q).await?;
    Ok(Json(candidates))
}
