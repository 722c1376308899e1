//! Library catalog HTTP handlers.
//!
//! This module implements the game-related API endpoints:
//! - GET /api/v1/games - List games, with filters
//! - POST /api/v1/games - Create a game by hand
//! - POST /api/v1/games/import - Import a game with metadata auto-fill
//! - GET/PATCH/DELETE /api/v1/games/:id - Read, patch, delete a game
//! - POST /api/v1/games/:id/metadata/refresh - Re-run the metadata lookup
//! - PUT/DELETE /api/v1/games/:id/tags/:tag_id - Attach or detach a tag
//! - GET /api/v1/games/:id/friends - Friends who own the game

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        friend::Friend,
        game::{CreateGameRequest, GameFilter, GameResponse, ImportGameRequest, UpdateGameRequest},
    },
    services::{friend_service, game_service, import_service},
    state::AppState,
};

/// List games.
///
/// # Query Parameters
///
/// `search`, `platform_id`, `tag_id`, `multiplayer`, `coop`, `min_players`;
/// all optional and combined with AND.
///
/// # Response (200 OK)
///
/// Array of games ordered by name, each with `platforms` and `tags`.
pub async fn list_games(
    State(pool): State<DbPool>,
    Query(filter): Query<GameFilter>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let games = game_service::list_games(&pool, filter).await?;
    Ok(Json(games))
}

/// Create a game.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Deep Rock Galactic",
///   "online_multiplayer": true,
///   "coop": true,
///   "max_players": 4,
///   "platform_ids": ["550e8400-..."],
///   "tag_ids": []
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: The game with its platforms and tags
/// - **400**: Blank name, bad year, player count or cover URL
/// - **404**: Unknown platform or tag id
pub async fn create_game(
    State(pool): State<DbPool>,
    Json(request): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let game = game_service::create_game(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Import a game by name.
///
/// With `auto_fill` (the default) and metadata credentials configured, the
/// closest metadata match fills description, year, cover, multiplayer flags
/// and genre tags. A failed lookup still creates the game.
///
/// # Response
///
/// - **201 Created**: The imported game
pub async fn import_game(
    State(state): State<AppState>,
    Json(request): Json<ImportGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let game = import_service::import_game(&state.pool, state.metadata(), request).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn get_game(
    State(pool): State<DbPool>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::get_game(&pool, game_id).await?;
    Ok(Json(game))
}

/// Patch a game.
///
/// Absent fields are unchanged; empty strings clear text fields;
/// `platform_ids`/`tag_ids` replace the whole set.
pub async fn update_game(
    State(pool): State<DbPool>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<UpdateGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::update_game(&pool, game_id, request).await?;
    Ok(Json(game))
}

/// Delete a game.
///
/// # Response
///
/// Returns 204 No Content on success, 404 if the game does not exist.
pub async fn delete_game(
    State(pool): State<DbPool>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&pool, game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-run the metadata lookup for a game.
///
/// # Response
///
/// - **200 OK**: The updated game
/// - **404**: Unknown game, or nothing in the metadata database matches it
/// - **502**: Metadata API failure
/// - **503**: Metadata not configured
pub async fn refresh_metadata(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    let game = import_service::refresh_metadata(&state.pool, state.metadata(), game_id).await?;
    Ok(Json(game))
}

pub async fn add_tag(
    State(pool): State<DbPool>,
    Path((game_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::add_tag(&pool, game_id, tag_id).await?;
    Ok(Json(game))
}

pub async fn remove_tag(
    State(pool): State<DbPool>,
    Path((game_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::remove_tag(&pool, game_id, tag_id).await?;
    Ok(Json(game))
}

pub async fn list_owners(
    State(pool): State<DbPool>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Vec<Friend>>, AppError> {
    let friends = friend_service::owners_of(&pool, game_id).await?;
    Ok(Json(friends))
}
