//! Friend HTTP handlers.
//!
//! - GET /api/v1/friends - List friends
//! - POST /api/v1/friends - Add a friend
//! - DELETE /api/v1/friends/:id - Remove a friend
//! - GET /api/v1/friends/:id/games - Games the friend owns
//! - PUT/DELETE /api/v1/friends/:id/games/:game_id - Record or forget ownership

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
        friend::{CreateFriendRequest, Friend, FriendGamesQuery},
        game::Game,
    },
    services::friend_service,
};

pub async fn list_friends(State(pool): State<DbPool>) -> Result<Json<Vec<Friend>>, AppError> {
    Ok(Json(friend_service::list_friends(&pool).await?))
}

pub async fn create_friend(
    State(pool): State<DbPool>,
    Json(request): Json<CreateFriendRequest>,
) -> Result<impl IntoResponse, AppError> {
    let friend = friend_service::create_friend(&pool, &request.name).await?;
    Ok((StatusCode::CREATED, Json(friend)))
}

pub async fn delete_friend(
    State(pool): State<DbPool>,
    Path(friend_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    friend_service::delete_friend(&pool, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Games a friend owns.
///
/// `?multiplayer=true` keeps only games the two of you can play together.
pub async fn list_owned_games(
    State(pool): State<DbPool>,
    Path(friend_id): Path<Uuid>,
    Query(query): Query<FriendGamesQuery>,
) -> Result<Json<Vec<Game>>, AppError> {
    let games = friend_service::owned_games(&pool, friend_id, query.multiplayer).await?;
    Ok(Json(games))
}

pub async fn add_owned_game(
    State(pool): State<DbPool>,
    Path((friend_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    friend_service::add_owned_game(&pool, friend_id, game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_owned_game(
    State(pool): State<DbPool>,
    Path((friend_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    friend_service::remove_owned_game(&pool, friend_id, game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
