//! Friend service - who owns which games.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{friend::Friend, game::Game},
    services::game_service,
};

pub async fn create_friend(pool: &DbPool, name: &str) -> Result<Friend, AppError> {
    let name = super::required_name(name, "name")?;

    let friend = sqlx::query_as::<_, Friend>(
        r#"
        INSERT INTO friends (id, name, created_at)
        VALUES (?, ?, ?)
        RETURNING id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(friend)
}

pub async fn list_friends(pool: &DbPool) -> Result<Vec<Friend>, AppError> {
    let friends = sqlx::query_as::<_, Friend>(
        "SELECT id, name, created_at FROM friends ORDER BY name COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await?;

    Ok(friends)
}

pub async fn delete_friend(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM friends WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::FriendNotFound);
    }

    Ok(())
}

async fn ensure_friend(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM friends WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    if count == 0 {
        return Err(AppError::FriendNotFound);
    }
    Ok(())
}

/// Record that a friend owns a game. Recording it twice is a no-op.
pub async fn add_owned_game(pool: &DbPool, friend_id: Uuid, game_id: Uuid) -> Result<(), AppError> {
    ensure_friend(pool, friend_id).await?;
    let mut conn = pool.acquire().await?;
    game_service::fetch_game(&mut conn, game_id).await?;

    sqlx::query("INSERT OR IGNORE INTO friend_games (friend_id, game_id) VALUES (?, ?)")
        .bind(friend_id)
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn remove_owned_game(
    pool: &DbPool,
    friend_id: Uuid,
    game_id: Uuid,
) -> Result<(), AppError> {
    ensure_friend(pool, friend_id).await?;

    let result = sqlx::query("DELETE FROM friend_games WHERE friend_id = ? AND game_id = ?")
        .bind(friend_id)
        .bind(game_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::GameNotFound);
    }

    Ok(())
}

/// Games a friend owns, by name. With `multiplayer_only`, just the ones
/// that can be played together (online, local or co-op).
pub async fn owned_games(
    pool: &DbPool,
    friend_id: Uuid,
    multiplayer_only: bool,
) -> Result<Vec<Game>, AppError> {
    ensure_friend(pool, friend_id).await?;

    let games = sqlx::query_as::<_, Game>(
        r#"
        SELECT g.id, g.name, g.description, g.release_year, g.cover_url, g.metadata_id,
               g.online_multiplayer, g.local_multiplayer, g.coop, g.max_players, g.notes,
               g.created_at, g.updated_at
        FROM games g
        JOIN friend_games fg ON fg.game_id = g.id
        WHERE fg.friend_id = ?
        ORDER BY g.name COLLATE NOCASE
        "#,
    )
    .bind(friend_id)
    .fetch_all(pool)
    .await?;

    if multiplayer_only {
        return Ok(games.into_iter().filter(Game::is_multiplayer).collect());
    }
    Ok(games)
}

/// Friends who own a game, by name.
pub async fn owners_of(pool: &DbPool, game_id: Uuid) -> Result<Vec<Friend>, AppError> {
    let mut conn = pool.acquire().await?;
    game_service::fetch_game(&mut conn, game_id).await?;

    let friends = sqlx::query_as::<_, Friend>(
        r#"
        SELECT f.id, f.name, f.created_at
        FROM friends f
        JOIN friend_games fg ON fg.friend_id = f.id
        WHERE fg.game_id = ?
        ORDER BY f.name COLLATE NOCASE
        "#,
    )
    .bind(game_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(friends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::test_pool, models::game::CreateGameRequest};

    async fn game(pool: &DbPool, name: &str, coop: bool) -> Uuid {
        game_service::create_game(
            pool,
            CreateGameRequest {
                name: name.to_string(),
                coop,
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .game
        .id
    }

    #[tokio::test]
    async fn ownership_is_tracked_both_ways() {
        let pool = test_pool().await;
        let sam = create_friend(&pool, "Sam").await.unwrap();
        let alex = create_friend(&pool, "Alex").await.unwrap();
        let valheim = game(&pool, "Valheim", true).await;
        let celeste = game(&pool, "Celeste", false).await;

        add_owned_game(&pool, sam.id, valheim).await.unwrap();
        add_owned_game(&pool, sam.id, valheim).await.unwrap();
        add_owned_game(&pool, sam.id, celeste).await.unwrap();
        add_owned_game(&pool, alex.id, valheim).await.unwrap();

        let owners: Vec<String> = owners_of(&pool, valheim)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(owners, vec!["Alex", "Sam"]);

        let all = owned_games(&pool, sam.id, false).await.unwrap();
        assert_eq!(all.len(), 2);

        let together = owned_games(&pool, sam.id, true).await.unwrap();
        assert_eq!(together.len(), 1);
        assert_eq!(together[0].name, "Valheim");
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let pool = test_pool().await;
        let sam = create_friend(&pool, "Sam").await.unwrap();
        let valheim = game(&pool, "Valheim", true).await;

        assert!(matches!(
            add_owned_game(&pool, Uuid::new_v4(), valheim).await.unwrap_err(),
            AppError::FriendNotFound
        ));
        assert!(matches!(
            add_owned_game(&pool, sam.id, Uuid::new_v4()).await.unwrap_err(),
            AppError::GameNotFound
        ));
        assert!(matches!(
            remove_owned_game(&pool, sam.id, valheim).await.unwrap_err(),
            AppError::GameNotFound
        ));
        assert!(matches!(
            owners_of(&pool, Uuid::new_v4()).await.unwrap_err(),
            AppError::GameNotFound
        ));
    }

    #[tokio::test]
    async fn deleting_friend_drops_ownership() {
        let pool = test_pool().await;
        let sam = create_friend(&pool, "Sam").await.unwrap();
        let valheim = game(&pool, "Valheim", true).await;
        add_owned_game(&pool, sam.id, valheim).await.unwrap();

        delete_friend(&pool, sam.id).await.unwrap();

        assert!(owners_of(&pool, valheim).await.unwrap().is_empty());
        assert!(list_friends(&pool).await.unwrap().is_empty());
        assert!(matches!(
            delete_friend(&pool, sam.id).await.unwrap_err(),
            AppError::FriendNotFound
        ));
    }

    #[tokio::test]
    async fn duplicate_friend_names_conflict() {
        let pool = test_pool().await;
        create_friend(&pool, "Sam").await.unwrap();
        assert!(matches!(
            create_friend(&pool, "sam").await.unwrap_err(),
            AppError::Conflict(_)
        ));
    }
}
