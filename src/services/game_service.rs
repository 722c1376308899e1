//! Game service - the library catalog.
//!
//! This service handles:
//! - Creating, patching and deleting games
//! - Keeping platform and tag links in step with the game
//! - Filtered listing
//!
//! Multi-statement changes run inside one SQLite transaction.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::{
        game::{CreateGameRequest, Game, GameFilter, GameResponse, UpdateGameRequest},
        platform::Platform,
        tag::Tag,
    },
    services::shortlist_service,
};

const GAME_COLUMNS: &str = "g.id, g.name, g.description, g.release_year, g.cover_url, \
g.metadata_id, g.online_multiplayer, g.local_multiplayer, g.coop, g.max_players, g.notes, \
g.created_at, g.updated_at";

/// Fields of a game about to be inserted, already validated.
#[derive(Debug, Clone, Default)]
pub struct NewGame {
    pub name: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
    pub cover_url: Option<String>,
    pub metadata_id: Option<i64>,
    pub online_multiplayer: bool,
    pub local_multiplayer: bool,
    pub coop: bool,
    pub max_players: Option<i64>,
    pub notes: Option<String>,
}

/// Blank strings count as absent.
fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_cover_url(value: Option<String>) -> Result<Option<String>, AppError> {
    let Some(raw) = optional_text(value) else {
        return Ok(None);
    };
    let parsed = url::Url::parse(&raw)
        .map_err(|_| AppError::InvalidRequest("cover_url is not a valid URL".to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(Some(raw)),
        _ => Err(AppError::InvalidRequest(
            "cover_url must use http or https".to_string(),
        )),
    }
}

fn validate_numbers(release_year: Option<i64>, max_players: Option<i64>) -> Result<(), AppError> {
    if release_year.is_some_and(|y| !(1000..=9999).contains(&y)) {
        return Err(AppError::InvalidRequest(
            "release_year must be a four-digit year".to_string(),
        ));
    }
    if max_players.is_some_and(|n| n < 1) {
        return Err(AppError::InvalidRequest(
            "max_players must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl TryFrom<CreateGameRequest> for NewGame {
    type Error = AppError;

    fn try_from(request: CreateGameRequest) -> Result<Self, Self::Error> {
        validate_numbers(request.release_year, request.max_players)?;

        Ok(Self {
            name: super::required_name(&request.name, "name")?,
            description: optional_text(request.description),
            release_year: request.release_year,
            cover_url: validate_cover_url(request.cover_url)?,
            metadata_id: request.metadata_id,
            online_multiplayer: request.online_multiplayer,
            local_multiplayer: request.local_multiplayer,
            coop: request.coop,
            max_players: request.max_players,
            notes: optional_text(request.notes),
        })
    }
}

/// Search key stored in `name_folded`; SQLite's own case folding is ASCII only.
fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Insert a game row on an open connection or transaction.
pub async fn insert_game(conn: &mut SqliteConnection, game: &NewGame) -> Result<Game, AppError> {
    let now = Utc::now();

    let game = sqlx::query_as::<_, Game>(
        r#"
        INSERT INTO games (
            id, name, name_folded, description, release_year, cover_url, metadata_id,
            online_multiplayer, local_multiplayer, coop, max_players, notes,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, name, description, release_year, cover_url, metadata_id,
            online_multiplayer, local_multiplayer, coop, max_players, notes,
            created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&game.name)
    .bind(fold(&game.name))
    .bind(&game.description)
    .bind(game.release_year)
    .bind(&game.cover_url)
    .bind(game.metadata_id)
    .bind(game.online_multiplayer)
    .bind(game.local_multiplayer)
    .bind(game.coop)
    .bind(game.max_players)
    .bind(&game.notes)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(game)
}

/// Write every mutable column of `game` back to its row and bump `updated_at`.
pub async fn save_game(conn: &mut SqliteConnection, game: &mut Game) -> Result<(), AppError> {
    game.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE games
        SET name = ?, name_folded = ?, description = ?, release_year = ?, cover_url = ?,
            metadata_id = ?, online_multiplayer = ?, local_multiplayer = ?, coop = ?,
            max_players = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&game.name)
    .bind(fold(&game.name))
    .bind(&game.description)
    .bind(game.release_year)
    .bind(&game.cover_url)
    .bind(game.metadata_id)
    .bind(game.online_multiplayer)
    .bind(game.local_multiplayer)
    .bind(game.coop)
    .bind(game.max_players)
    .bind(&game.notes)
    .bind(game.updated_at)
    .bind(game.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Load one game row.
pub async fn fetch_game(conn: &mut SqliteConnection, id: Uuid) -> Result<Game, AppError> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.id = ?");
    let game = sqlx::query_as::<_, Game>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::GameNotFound)?;

    Ok(game)
}

/// Replace the platform set of a game.
///
/// # Errors
///
/// - `PlatformNotFound`: One of the ids does not exist
pub async fn set_platforms(
    conn: &mut SqliteConnection,
    game_id: Uuid,
    platform_ids: &[Uuid],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM game_platforms WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    for platform_id in platform_ids {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM platforms WHERE id = ?")
            .bind(platform_id)
            .fetch_one(&mut *conn)
            .await?;
        if count == 0 {
            return Err(AppError::PlatformNotFound);
        }

        sqlx::query(
            "INSERT OR IGNORE INTO game_platforms (game_id, platform_id) VALUES (?, ?)",
        )
        .bind(game_id)
        .bind(platform_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Replace the tag set of a game.
///
/// # Errors
///
/// - `TagNotFound`: One of the ids does not exist
pub async fn set_tags(
    conn: &mut SqliteConnection,
    game_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM game_tags WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    for tag_id in tag_ids {
        link_tag(conn, game_id, *tag_id).await?;
    }

    Ok(())
}

/// Attach a tag to a game; attaching twice is a no-op.
pub async fn link_tag(
    conn: &mut SqliteConnection,
    game_id: Uuid,
    tag_id: Uuid,
) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_one(&mut *conn)
        .await?;
    if count == 0 {
        return Err(AppError::TagNotFound);
    }

    sqlx::query("INSERT OR IGNORE INTO game_tags (game_id, tag_id) VALUES (?, ?)")
        .bind(game_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Game row plus its platforms and tags.
pub async fn with_relations(
    conn: &mut SqliteConnection,
    game: Game,
) -> Result<GameResponse, AppError> {
    let platforms = sqlx::query_as::<_, Platform>(
        r#"
        SELECT p.id, p.name, p.created_at
        FROM platforms p
        JOIN game_platforms gp ON gp.platform_id = p.id
        WHERE gp.game_id = ?
        ORDER BY p.name COLLATE NOCASE
        "#,
    )
    .bind(game.id)
    .fetch_all(&mut *conn)
    .await?;

    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name, t.color, t.created_at
        FROM tags t
        JOIN game_tags gt ON gt.tag_id = t.id
        WHERE gt.game_id = ?
        ORDER BY t.name COLLATE NOCASE
        "#,
    )
    .bind(game.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(GameResponse {
        game,
        platforms,
        tags,
    })
}

/// Create a game with its platform and tag links.
///
/// # Errors
///
/// - `InvalidRequest`: Blank name, bad year, player count or cover URL
/// - `PlatformNotFound` / `TagNotFound`: Unknown link ids (nothing is written)
pub async fn create_game(
    pool: &DbPool,
    request: CreateGameRequest,
) -> Result<GameResponse, AppError> {
    let platform_ids = request.platform_ids.clone();
    let tag_ids = request.tag_ids.clone();
    let new_game = NewGame::try_from(request)?;

    let mut tx = db::begin_write(pool).await?;
    let game = insert_game(&mut tx, &new_game).await?;
    set_platforms(&mut tx, game.id, &platform_ids).await?;
    set_tags(&mut tx, game.id, &tag_ids).await?;
    let response = with_relations(&mut tx, game).await?;
    tx.commit().await?;

    tracing::info!("Added {} to the library", response.game.name);
    Ok(response)
}

pub async fn get_game(pool: &DbPool, id: Uuid) -> Result<GameResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let game = fetch_game(&mut conn, id).await?;
    with_relations(&mut conn, game).await
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Games matching every given filter, ordered by name.
///
/// The name search is a case-insensitive substring match over full Unicode.
pub async fn list_games(
    pool: &DbPool,
    filter: GameFilter,
) -> Result<Vec<GameResponse>, AppError> {
    let mut query =
        QueryBuilder::<Sqlite>::new(format!("SELECT {GAME_COLUMNS} FROM games g WHERE 1 = 1"));

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query
            .push(" AND g.name_folded LIKE ")
            .push_bind(like_pattern(&fold(search)))
            .push(" ESCAPE '\\'");
    }
    if let Some(platform_id) = filter.platform_id {
        query
            .push(" AND EXISTS (SELECT 1 FROM game_platforms gp")
            .push(" WHERE gp.game_id = g.id AND gp.platform_id = ")
            .push_bind(platform_id)
            .push(")");
    }
    if let Some(tag_id) = filter.tag_id {
        query
            .push(" AND EXISTS (SELECT 1 FROM game_tags gt")
            .push(" WHERE gt.game_id = g.id AND gt.tag_id = ")
            .push_bind(tag_id)
            .push(")");
    }
    match filter.multiplayer {
        Some(true) => {
            query.push(" AND (g.online_multiplayer OR g.local_multiplayer)");
        }
        Some(false) => {
            query.push(" AND NOT (g.online_multiplayer OR g.local_multiplayer)");
        }
        None => {}
    }
    if let Some(coop) = filter.coop {
        query.push(" AND g.coop = ").push_bind(coop);
    }
    if let Some(min_players) = filter.min_players {
        query.push(" AND g.max_players >= ").push_bind(min_players);
    }
    query.push(" ORDER BY g.name COLLATE NOCASE, g.created_at");

    let mut conn = pool.acquire().await?;
    let games = query.build_query_as::<Game>().fetch_all(&mut *conn).await?;

    let mut responses = Vec::with_capacity(games.len());
    for game in games {
        responses.push(with_relations(&mut conn, game).await?);
    }

    Ok(responses)
}

/// Apply a patch to a game.
///
/// `null` clears an optional field. Empty strings also clear the text fields
/// (`description`, `cover_url`, `notes`).
pub async fn update_game(
    pool: &DbPool,
    id: Uuid,
    request: UpdateGameRequest,
) -> Result<GameResponse, AppError> {
    validate_numbers(request.release_year.flatten(), request.max_players.flatten())?;

    let mut tx = db::begin_write(pool).await?;
    let mut game = fetch_game(&mut tx, id).await?;

    if let Some(name) = request.name {
        game.name = super::required_name(&name, "name")?;
    }
    if let Some(description) = request.description {
        game.description = optional_text(description);
    }
    if let Some(year) = request.release_year {
        game.release_year = year;
    }
    if let Some(cover_url) = request.cover_url {
        game.cover_url = validate_cover_url(cover_url)?;
    }
    if let Some(online) = request.online_multiplayer {
        game.online_multiplayer = online;
    }
    if let Some(local) = request.local_multiplayer {
        game.local_multiplayer = local;
    }
    if let Some(coop) = request.coop {
        game.coop = coop;
    }
    if let Some(max_players) = request.max_players {
        game.max_players = max_players;
    }
    if let Some(notes) = request.notes {
        game.notes = optional_text(notes);
    }

    save_game(&mut tx, &mut game).await?;

    if let Some(platform_ids) = request.platform_ids {
        set_platforms(&mut tx, id, &platform_ids).await?;
    }
    if let Some(tag_ids) = request.tag_ids {
        set_tags(&mut tx, id, &tag_ids).await?;
    }

    let response = with_relations(&mut tx, game).await?;
    tx.commit().await?;

    Ok(response)
}

/// Delete a game. Its links and shortlist entry go with it and the
/// shortlist is renumbered.
pub async fn delete_game(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = db::begin_write(pool).await?;

    let result = sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::GameNotFound);
    }

    shortlist_service::renumber(&mut tx).await?;
    tx.commit().await?;

    tracing::info!("Removed game {} from the library", id);
    Ok(())
}

pub async fn add_tag(
    pool: &DbPool,
    game_id: Uuid,
    tag_id: Uuid,
) -> Result<GameResponse, AppError> {
    let mut tx = db::begin_write(pool).await?;
    let game = fetch_game(&mut tx, game_id).await?;
    link_tag(&mut tx, game_id, tag_id).await?;
    let response = with_relations(&mut tx, game).await?;
    tx.commit().await?;
    Ok(response)
}

pub async fn remove_tag(
    pool: &DbPool,
    game_id: Uuid,
    tag_id: Uuid,
) -> Result<GameResponse, AppError> {
    let mut tx = db::begin_write(pool).await?;
    let game = fetch_game(&mut tx, game_id).await?;

    let result = sqlx::query("DELETE FROM game_tags WHERE game_id = ? AND tag_id = ?")
        .bind(game_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::TagNotFound);
    }

    let response = with_relations(&mut tx, game).await?;
    tx.commit().await?;
    Ok(response)
}
