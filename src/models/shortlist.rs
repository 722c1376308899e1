//! Shortlist models: the ordered queue of games to play next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game::Game;

/// Represents a row of the `shortlist_entries` table.
///
/// Positions are 0-based and contiguous across the whole shortlist.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, PartialEq)]
pub struct ShortlistEntry {
    pub game_id: Uuid,
    pub position: i64,
    pub note: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Request body for `POST /api/v1/shortlist`.
#[derive(Debug, Deserialize)]
pub struct AddToShortlistRequest {
    pub game_id: Uuid,
    #[serde(default)]
    pub note: Option<String>,
}

/// Request body for `PUT /api/v1/shortlist/{game_id}/position`.
///
/// Out-of-range positions are clamped to the end of the list.
#[derive(Debug, Deserialize)]
pub struct MoveShortlistRequest {
    pub position: i64,
}

/// Shortlist entry together with its game.
#[derive(Debug, Clone, Serialize)]
pub struct ShortlistItem {
    pub position: i64,
    pub note: Option<String>,
    pub added_at: DateTime<Utc>,
    pub game: Game,
}
