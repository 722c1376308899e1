//! Platform service - the consoles, stores and launchers games are owned on.

use chrono::Utc;
use uuid::Uuid;

use crate::{db::DbPool, error::AppError, models::platform::Platform};

/// Create a platform.
///
/// # Errors
///
/// - `InvalidRequest`: Name is blank
/// - `Conflict`: A platform with the same name (ignoring case) exists
pub async fn create_platform(pool: &DbPool, name: &str) -> Result<Platform, AppError> {
    let name = super::required_name(name, "name")?;

    let platform = sqlx::query_as::<_, Platform>(
        r#"
        INSERT INTO platforms (id, name, created_at)
        VALUES (?, ?, ?)
        RETURNING id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!("Created platform {} ({})", platform.name, platform.id);
    Ok(platform)
}

/// All platforms ordered by name.
pub async fn list_platforms(pool: &DbPool) -> Result<Vec<Platform>, AppError> {
    let platforms = sqlx::query_as::<_, Platform>(
        "SELECT id, name, created_at FROM platforms ORDER BY name COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await?;

    Ok(platforms)
}

/// Delete a platform; its game links go with it.
pub async fn delete_platform(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM platforms WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::PlatformNotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn platforms_are_listed_by_name() {
        let pool = test_pool().await;
        create_platform(&pool, "Steam").await.unwrap();
        create_platform(&pool, "  gog  ").await.unwrap();
        create_platform(&pool, "Nintendo Switch").await.unwrap();

        let names: Vec<String> = list_platforms(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["gog", "Nintendo Switch", "Steam"]);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_ignoring_case() {
        let pool = test_pool().await;
        create_platform(&pool, "Steam").await.unwrap();

        let err = create_platform(&pool, "STEAM").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let pool = test_pool().await;
        let err = create_platform(&pool, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn deleting_unknown_platform_is_not_found() {
        let pool = test_pool().await;
        let platform = create_platform(&pool, "Epic").await.unwrap();

        delete_platform(&pool, platform.id).await.unwrap();
        let err = delete_platform(&pool, platform.id).await.unwrap_err();
        assert!(matches!(err, AppError::PlatformNotFound));
    }
}
