//! Platform data models.
//!
//! A platform is anything a game can be owned on: a console, a PC launcher
//! (Steam, GOG, Epic), or a mobile store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a row of the `platforms` table.
///
/// Names are unique regardless of case.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, PartialEq)]
pub struct Platform {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a platform.
///
/// ```json
/// { "name": "Steam" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreatePlatformRequest {
    pub name: String,
}
