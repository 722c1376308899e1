//! Shortlist HTTP handlers.
//!
//! - GET /api/v1/shortlist - Games to play next, in order
//! - POST /api/v1/shortlist - Append a game
//! - DELETE /api/v1/shortlist/:game_id - Remove a game
//! - PUT /api/v1/shortlist/:game_id/position - Move a game

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::shortlist::{AddToShortlistRequest, MoveShortlistRequest, ShortlistItem},
    services::shortlist_service,
};

pub async fn list_shortlist(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<ShortlistItem>>, AppError> {
    Ok(Json(shortlist_service::list_shortlist(&pool).await?))
}

/// Append a game to the shortlist.
///
/// # Response
///
/// - **201 Created**: The new entry with its position
/// - **404**: Unknown game
/// - **409**: Game already shortlisted
pub async fn add_to_shortlist(
    State(pool): State<DbPool>,
    Json(request): Json<AddToShortlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let entry = shortlist_service::add_to_shortlist(&pool, request.game_id, request.note).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_from_shortlist(
    State(pool): State<DbPool>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    shortlist_service::remove_from_shortlist(&pool, game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a game within the shortlist; returns the reordered list.
pub async fn move_in_shortlist(
    State(pool): State<DbPool>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<MoveShortlistRequest>,
) -> Result<Json<Vec<ShortlistItem>>, AppError> {
    let items = shortlist_service::move_in_shortlist(&pool, game_id, request.position).await?;
    Ok(Json(items))
}
