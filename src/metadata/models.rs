//! Wire types for the metadata API and their mapping onto library fields.

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};

/// Fields requested for every game search.
pub const GAME_FIELDS: &str = "name,summary,first_release_date,cover.url,genres.name,\
game_modes.name,multiplayer_modes.onlinecoop,multiplayer_modes.offlinecoop,\
multiplayer_modes.lancoop,multiplayer_modes.splitscreen,multiplayer_modes.onlinemax,\
multiplayer_modes.offlinemax";

/// OAuth2 client-credentials token response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Cover {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MultiplayerMode {
    #[serde(default)]
    pub onlinecoop: bool,
    #[serde(default)]
    pub offlinecoop: bool,
    #[serde(default)]
    pub lancoop: bool,
    #[serde(default)]
    pub splitscreen: bool,
    #[serde(default)]
    pub onlinemax: Option<i64>,
    #[serde(default)]
    pub offlinemax: Option<i64>,
}

/// One game record as returned by `POST /games`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MetadataGame {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Unix timestamp, seconds.
    #[serde(default)]
    pub first_release_date: Option<i64>,
    #[serde(default)]
    pub cover: Option<Cover>,
    #[serde(default)]
    pub genres: Vec<Named>,
    #[serde(default)]
    pub game_modes: Vec<Named>,
    #[serde(default)]
    pub multiplayer_modes: Vec<MultiplayerMode>,
}

/// Library fields derived from a metadata record.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDetails {
    pub metadata_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
    pub cover_url: Option<String>,
    pub online_multiplayer: bool,
    pub local_multiplayer: bool,
    pub coop: bool,
    pub max_players: Option<i64>,
    pub genres: Vec<String>,
}

impl MetadataGame {
    fn has_mode(&self, needle: &str) -> bool {
        self.game_modes
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(needle))
    }

    pub fn release_year(&self) -> Option<i64> {
        let ts = self.first_release_date?;
        DateTime::from_timestamp(ts, 0).map(|dt| i64::from(dt.year()))
    }

    /// Cover image URL as an absolute https URL at cover size.
    ///
    /// The API hands out protocol-relative thumbnail URLs (`//images…/t_thumb/…`).
    pub fn cover_url(&self) -> Option<String> {
        let raw = self.cover.as_ref()?.url.trim();
        if raw.is_empty() {
            return None;
        }
        let absolute = match raw.strip_prefix("//") {
            Some(rest) => format!("https://{rest}"),
            None => raw.to_string(),
        };
        Some(absolute.replace("/t_thumb/", "/t_cover_big/"))
    }

    pub fn details(&self) -> GameDetails {
        let modes = &self.multiplayer_modes;

        let online_multiplayer = self.has_mode("Multiplayer")
            || self.has_mode("Massively Multiplayer Online (MMO)")
            || self.has_mode("Battle Royale")
            || modes
                .iter()
                .any(|m| m.onlinecoop || m.onlinemax.is_some_and(|n| n > 1));

        let local_multiplayer = self.has_mode("Split screen")
            || modes.iter().any(|m| {
                m.splitscreen || m.offlinecoop || m.offlinemax.is_some_and(|n| n > 1)
            });

        let coop = self.has_mode("Co-operative")
            || modes
                .iter()
                .any(|m| m.onlinecoop || m.offlinecoop || m.lancoop);

        let max_players = modes
            .iter()
            .flat_map(|m| [m.onlinemax, m.offlinemax])
            .flatten()
            .filter(|&n| n >= 1)
            .max();

        GameDetails {
            metadata_id: self.id,
            name: self.name.clone(),
            description: self
                .summary
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            release_year: self.release_year(),
            cover_url: self.cover_url(),
            online_multiplayer,
            local_multiplayer,
            coop,
            max_players,
            genres: self.genres.iter().map(|g| g.name.clone()).collect(),
        }
    }
}
