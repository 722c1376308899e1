//! Friend data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a row of the `friends` table.
///
/// Which games a friend owns is kept in `friend_games`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, PartialEq)]
pub struct Friend {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for adding a friend.
#[derive(Debug, Deserialize)]
pub struct CreateFriendRequest {
    pub name: String,
}

/// Query string for `GET /api/v1/friends/{id}/games`.
///
/// With `multiplayer=true` only games that can be played together
/// (online, local or co-op) are returned.
#[derive(Debug, Default, Deserialize)]
pub struct FriendGamesQuery {
    #[serde(default)]
    pub multiplayer: bool,
}
