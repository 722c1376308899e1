//! Shortlist service - the ordered queue of games to play next.
//!
//! Positions are always 0..n with no gaps. Every reordering loads the
//! current order, edits it in memory and writes positions back inside one
//! transaction.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::shortlist::{ShortlistEntry, ShortlistItem},
    services::game_service,
};

async fn ordered_game_ids(conn: &mut SqliteConnection) -> Result<Vec<Uuid>, AppError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT game_id FROM shortlist_entries ORDER BY position, added_at",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

async fn write_positions(conn: &mut SqliteConnection, order: &[Uuid]) -> Result<(), AppError> {
    for (position, game_id) in order.iter().enumerate() {
        sqlx::query("UPDATE shortlist_entries SET position = ? WHERE game_id = ?")
            .bind(position as i64)
            .bind(game_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Close gaps left by deleted entries, keeping the relative order.
pub async fn renumber(conn: &mut SqliteConnection) -> Result<(), AppError> {
    let order = ordered_game_ids(conn).await?;
    write_positions(conn, &order).await
}

/// Shortlisted games in play order.
pub async fn list_shortlist(pool: &DbPool) -> Result<Vec<ShortlistItem>, AppError> {
    let mut conn = pool.acquire().await?;

    let entries = sqlx::query_as::<_, ShortlistEntry>(
        "SELECT game_id, position, note, added_at FROM shortlist_entries ORDER BY position",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let game = game_service::fetch_game(&mut conn, entry.game_id).await?;
        items.push(ShortlistItem {
            position: entry.position,
            note: entry.note,
            added_at: entry.added_at,
            game,
        });
    }

    Ok(items)
}

/// Append a game to the end of the shortlist.
///
/// # Errors
///
/// - `GameNotFound`: Unknown game
/// - `Conflict`: Game is already shortlisted
pub async fn add_to_shortlist(
    pool: &DbPool,
    game_id: Uuid,
    note: Option<String>,
) -> Result<ShortlistEntry, AppError> {
    let mut tx = db::begin_write(pool).await?;
    let game = game_service::fetch_game(&mut tx, game_id).await?;

    let listed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM shortlist_entries WHERE game_id = ?")
            .bind(game_id)
            .fetch_one(&mut *tx)
            .await?;
    if listed > 0 {
        return Err(AppError::Conflict(format!(
            "{} is already on the shortlist",
            game.name
        )));
    }

    let next_position: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortlist_entries")
        .fetch_one(&mut *tx)
        .await?;

    let entry = sqlx::query_as::<_, ShortlistEntry>(
        r#"
        INSERT INTO shortlist_entries (game_id, position, note, added_at)
        VALUES (?, ?, ?, ?)
        RETURNING game_id, position, note, added_at
        "#,
    )
    .bind(game_id)
    .bind(next_position)
    .bind(note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()))
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Shortlisted {} at position {}", game.name, entry.position);
    Ok(entry)
}

/// Remove a game from the shortlist; later entries move up one place.
pub async fn remove_from_shortlist(pool: &DbPool, game_id: Uuid) -> Result<(), AppError> {
    let mut tx = db::begin_write(pool).await?;

    let result = sqlx::query("DELETE FROM shortlist_entries WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::ShortlistEntryNotFound);
    }

    renumber(&mut tx).await?;
    tx.commit().await?;

    Ok(())
}

/// Move a shortlisted game to `position`, clamped to the list bounds.
///
/// Returns the full shortlist in its new order.
pub async fn move_in_shortlist(
    pool: &DbPool,
    game_id: Uuid,
    position: i64,
) -> Result<Vec<ShortlistItem>, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let mut order = ordered_game_ids(&mut tx).await?;
    let current = order
        .iter()
        .position(|id| *id == game_id)
        .ok_or(AppError::ShortlistEntryNotFound)?;

    let moved = order.remove(current);
    let target = position.clamp(0, order.len() as i64) as usize;
    order.insert(target, moved);

    write_positions(&mut tx, &order).await?;
    tx.commit().await?;

    list_shortlist(pool).await
}
