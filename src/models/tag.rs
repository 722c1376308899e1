//! Tag data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a row of the `tags` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, PartialEq)]
pub struct Tag {
    pub id: Uuid,

    /// Unique regardless of case
    pub name: String,

    /// Display color as `#rrggbb`
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Tag with the number of games carrying it, as returned by the tag list.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TagSummary {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub game_count: i64,
}

/// Request body for creating a tag.
///
/// ```json
/// { "name": "Couch co-op", "color": "#ff8800" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request body for renaming or recoloring a tag. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}
