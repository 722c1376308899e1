//! Game data models and API request/response types.
//!
//! This module defines:
//! - `Game`: Database entity representing a library entry
//! - `CreateGameRequest`, `UpdateGameRequest`, `ImportGameRequest`: request bodies
//! - `GameFilter`: list query parameters
//! - `GameResponse`: Response body returned to clients, with platforms and tags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{platform::Platform, tag::Tag};

/// Represents a game record from the database.
///
/// # Database Table
///
/// Maps to the `games` table. Platforms and tags live in the
/// `game_platforms` and `game_tags` link tables.
///
/// # Multiplayer Flags
///
/// - `online_multiplayer`: can be played with others over the network
/// - `local_multiplayer`: split screen or shared screen
/// - `coop`: players work together rather than against each other
///
/// `max_players` is the largest supported party, when known.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, PartialEq)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
    pub cover_url: Option<String>,

    /// Identifier of the matching record in the metadata database
    pub metadata_id: Option<i64>,

    pub online_multiplayer: bool,
    pub local_multiplayer: bool,
    pub coop: bool,
    pub max_players: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Whether the game can be played with someone else at all.
    pub fn is_multiplayer(&self) -> bool {
        self.online_multiplayer || self.local_multiplayer || self.coop
    }
}

/// Request body for creating a game by hand.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Deep Rock Galactic",
///   "release_year": 2020,
///   "online_multiplayer": true,
///   "coop": true,
///   "max_players": 4,
///   "platform_ids": ["550e8400-e29b-41d4-a716-446655440000"]
/// }
/// ```
///
/// # Validation
///
/// - `name`: Required, must not be blank
/// - `max_players`: At least 1 when present
/// - `cover_url`: Must be an http(s) URL when present
#[derive(Debug, Default, Deserialize)]
pub struct CreateGameRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_year: Option<i64>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub metadata_id: Option<i64>,
    #[serde(default)]
    pub online_multiplayer: bool,
    #[serde(default)]
    pub local_multiplayer: bool,
    #[serde(default)]
    pub coop: bool,
    #[serde(default)]
    pub max_players: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub platform_ids: Vec<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Keeps an explicit JSON `null` apart from a missing field.
///
/// Used with `#[serde(default)]`: a missing field stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(value))`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Patch body for `PATCH /api/v1/games/{id}`.
///
/// Absent fields are left unchanged. Optional fields are cleared with `null`;
/// for the text fields an empty string also clears. `platform_ids` and
/// `tag_ids`, when present, replace the whole set.
///
/// ```json
/// { "release_year": null, "notes": "finish the DLC" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGameRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub release_year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cover_url: Option<Option<String>>,
    #[serde(default)]
    pub online_multiplayer: Option<bool>,
    #[serde(default)]
    pub local_multiplayer: Option<bool>,
    #[serde(default)]
    pub coop: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_players: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub platform_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Request body for `POST /api/v1/games/import`.
///
/// ```json
/// { "name": "Hades", "platform_ids": ["…"], "auto_fill": true }
/// ```
#[derive(Debug, Deserialize)]
pub struct ImportGameRequest {
    pub name: String,
    #[serde(default)]
    pub platform_ids: Vec<Uuid>,

    /// Look the game up in the metadata database (defaults to true)
    #[serde(default = "default_auto_fill")]
    pub auto_fill: bool,
}

fn default_auto_fill() -> bool {
    true
}

/// Query parameters for `GET /api/v1/games`. All filters are combined with AND.
#[derive(Debug, Default, Deserialize)]
pub struct GameFilter {
    /// Case-insensitive substring of the name
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub platform_id: Option<Uuid>,
    #[serde(default)]
    pub tag_id: Option<Uuid>,

    /// Online or local multiplayer
    #[serde(default)]
    pub multiplayer: Option<bool>,
    #[serde(default)]
    pub coop: Option<bool>,

    /// Only games supporting at least this many players
    #[serde(default)]
    pub min_players: Option<i64>,
}

/// Game with its platforms and tags.
#[derive(Debug, Clone, Serialize)]
pub struct GameResponse {
    #[serde(flatten)]
    pub game: Game,
    pub platforms: Vec<Platform>,
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_tells_null_from_missing() {
        let patch: UpdateGameRequest = serde_json::from_value(json!({
            "release_year": null,
            "max_players": 4,
            "notes": null
        }))
        .unwrap();

        assert_eq!(patch.release_year, Some(None));
        assert_eq!(patch.max_players, Some(Some(4)));
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.description, None);
        assert_eq!(patch.cover_url, None);
    }
}
