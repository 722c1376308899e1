//! Import service - adding games with metadata auto-fill.
//!
//! # Process
//!
//! 1. Search the metadata API by the typed name
//! 2. Pick the result with the smallest edit distance to that name
//! 3. Fill description, year, cover, multiplayer flags and genre tags
//! 4. Insert the game with its links in one transaction
//!
//! Network calls happen before the transaction opens.

use serde::Serialize;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db::{self, DbPool},
    error::AppError,
    metadata::{
        MetadataClient,
        client::DEFAULT_SEARCH_LIMIT,
        matching,
        models::{GameDetails, MetadataGame},
    },
    models::game::{GameResponse, ImportGameRequest},
    services::{
        game_service::{self, NewGame},
        tag_service,
    },
};

/// Metadata search hit ranked against the query.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataCandidate {
    pub distance: usize,
    pub similarity: f64,
    #[serde(flatten)]
    pub game: MetadataGame,
}

fn apply_details(game: &mut NewGame, details: &GameDetails) {
    game.metadata_id = Some(details.metadata_id);
    game.description = details.description.clone();
    game.release_year = details.release_year;
    game.cover_url = details.cover_url.clone();
    game.online_multiplayer = details.online_multiplayer;
    game.local_multiplayer = details.local_multiplayer;
    game.coop = details.coop;
    game.max_players = details.max_players;
}

async fn tag_genres(
    conn: &mut SqliteConnection,
    game_id: Uuid,
    genres: &[String],
) -> Result<(), AppError> {
    for genre in genres.iter().filter(|g| !g.trim().is_empty()) {
        let tag = tag_service::get_or_create_tag(conn, genre).await?;
        game_service::link_tag(conn, game_id, tag.id).await?;
    }
    Ok(())
}

/// Import a game by name, auto-filling from the metadata API when possible.
///
/// Metadata failures never fail the import; the game is added with just its
/// name and the failure is logged.
pub async fn import_game(
    pool: &DbPool,
    metadata: Option<&MetadataClient>,
    request: ImportGameRequest,
) -> Result<GameResponse, AppError> {
    let mut new_game = NewGame {
        name: super::required_name(&request.name, "name")?,
        ..Default::default()
    };

    let details = match metadata {
        Some(client) if request.auto_fill => match client.find_best(&new_game.name).await {
            Ok(found) => found.map(|game| game.details()),
            Err(e) => {
                tracing::warn!("Metadata lookup for {:?} failed: {}", new_game.name, e);
                None
            }
        },
        None if request.auto_fill => {
            tracing::debug!("Metadata client not configured, importing {:?} as-is", new_game.name);
            None
        }
        _ => None,
    };

    if let Some(details) = &details {
        apply_details(&mut new_game, details);
    }

    let mut tx = db::begin_write(pool).await?;
    let game = game_service::insert_game(&mut tx, &new_game).await?;
    game_service::set_platforms(&mut tx, game.id, &request.platform_ids).await?;
    if let Some(details) = &details {
        tag_genres(&mut tx, game.id, &details.genres).await?;
    }
    let response = game_service::with_relations(&mut tx, game).await?;
    tx.commit().await?;

    tracing::info!(
        "Imported {} ({})",
        response.game.name,
        if details.is_some() { "auto-filled" } else { "no metadata" }
    );
    Ok(response)
}

/// Re-run the metadata lookup for an existing game and overwrite its metadata fields.
///
/// # Errors
///
/// - `MetadataUnavailable`: No metadata client configured
/// - `Metadata`: The lookup failed
/// - `MetadataNotFound`: The search came back empty
pub async fn refresh_metadata(
    pool: &DbPool,
    metadata: Option<&MetadataClient>,
    game_id: Uuid,
) -> Result<GameResponse, AppError> {
    let client = metadata.ok_or(AppError::MetadataUnavailable)?;

    let name = {
        let mut conn = pool.acquire().await?;
        game_service::fetch_game(&mut conn, game_id).await?.name
    };

    let details = client
        .find_best(&name)
        .await?
        .map(|game| game.details())
        .ok_or_else(|| AppError::MetadataNotFound(name.clone()))?;

    let mut tx = db::begin_write(pool).await?;
    let mut game = game_service::fetch_game(&mut tx, game_id).await?;
    game.metadata_id = Some(details.metadata_id);
    game.description = details.description.clone();
    game.release_year = details.release_year;
    game.cover_url = details.cover_url.clone();
    game.online_multiplayer = details.online_multiplayer;
    game.local_multiplayer = details.local_multiplayer;
    game.coop = details.coop;
    game.max_players = details.max_players;
    game_service::save_game(&mut tx, &mut game).await?;
    tag_genres(&mut tx, game_id, &details.genres).await?;
    let response = game_service::with_relations(&mut tx, game).await?;
    tx.commit().await?;

    Ok(response)
}

/// Search the metadata API and rank results by closeness to `query`.
pub async fn search_metadata(
    metadata: Option<&MetadataClient>,
    query: &str,
) -> Result<Vec<MetadataCandidate>, AppError> {
    let client = metadata.ok_or(AppError::MetadataUnavailable)?;
    let query = super::required_name(query, "q")?;

    let games = client.search(&query, DEFAULT_SEARCH_LIMIT).await?;
    let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
    let ranked = matching::rank(&query, &names);

    let mut slots: Vec<Option<MetadataGame>> = games.into_iter().map(Some).collect();
    let candidates = ranked
        .into_iter()
        .filter_map(|(index, distance)| {
            let game = slots[index].take()?;
            Some(MetadataCandidate {
                distance,
                similarity: matching::similarity(&query, &game.name),
                game,
            })
        })
        .collect();

    Ok(candidates)
}
