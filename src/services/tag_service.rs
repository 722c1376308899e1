//! Tag service - user-defined labels for organizing the library.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::tag::{CreateTagRequest, Tag, TagSummary, UpdateTagRequest},
};

/// Check a `#rrggbb` color. An empty string means "no color".
fn validate_color(color: Option<String>) -> Result<Option<String>, AppError> {
    let Some(color) = color.map(|c| c.trim().to_string()) else {
        return Ok(None);
    };
    if color.is_empty() {
        return Ok(None);
    }

    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::InvalidRequest(
            "color must be in #rrggbb format".to_string(),
        ));
    }

    Ok(Some(color.to_ascii_lowercase()))
}

/// Create a tag.
///
/// # Errors
///
/// - `InvalidRequest`: Blank name or malformed color
/// - `Conflict`: A tag with the same name (ignoring case) exists
pub async fn create_tag(pool: &DbPool, request: CreateTagRequest) -> Result<Tag, AppError> {
    let name = super::required_name(&request.name, "name")?;
    let color = validate_color(request.color)?;

    let tag = sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (id, name, color, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, color, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(color)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(tag)
}

/// Existing tag with this name (ignoring case), or a new one.
///
/// Runs on a connection so callers can include it in their transaction.
pub async fn get_or_create_tag(conn: &mut SqliteConnection, name: &str) -> Result<Tag, AppError> {
    let name = super::required_name(name, "name")?;

    if let Some(existing) = sqlx::query_as::<_, Tag>(
        "SELECT id, name, color, created_at FROM tags WHERE name = ? COLLATE NOCASE",
    )
    .bind(&name)
    .fetch_optional(&mut *conn)
    .await?
    {
        return Ok(existing);
    }

    let tag = sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (id, name, color, created_at)
        VALUES (?, ?, NULL, ?)
        RETURNING id, name, color, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!("Created tag {:?} during import", tag.name);
    Ok(tag)
}

/// All tags ordered by name, with how many games carry each.
pub async fn list_tags(pool: &DbPool) -> Result<Vec<TagSummary>, AppError> {
    let tags = sqlx::query_as::<_, TagSummary>(
        r#"
        SELECT t.id, t.name, t.color, COUNT(gt.game_id) AS game_count
        FROM tags t
        LEFT JOIN game_tags gt ON gt.tag_id = t.id
        GROUP BY t.id, t.name, t.color
        ORDER BY t.name COLLATE NOCASE
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// Rename and/or recolor a tag. An empty `color` clears it.
pub async fn update_tag(
    pool: &DbPool,
    id: Uuid,
    request: UpdateTagRequest,
) -> Result<Tag, AppError> {
    let mut tag = sqlx::query_as::<_, Tag>(
        "SELECT id, name, color, created_at FROM tags WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::TagNotFound)?;

    if let Some(name) = request.name {
        tag.name = super::required_name(&name, "name")?;
    }
    if request.color.is_some() {
        tag.color = validate_color(request.color)?;
    }

    sqlx::query("UPDATE tags SET name = ?, color = ? WHERE id = ?")
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(tag)
}

/// Delete a tag; it is removed from every game.
pub async fn delete_tag(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::TagNotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn request(name: &str, color: Option<&str>) -> CreateTagRequest {
        CreateTagRequest {
            name: name.to_string(),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn color_validation() {
        assert_eq!(validate_color(None).unwrap(), None);
        assert_eq!(validate_color(Some("".into())).unwrap(), None);
        assert_eq!(
            validate_color(Some("#FFaa00".into())).unwrap().as_deref(),
            Some("#ffaa00")
        );
        assert!(validate_color(Some("red".into())).is_err());
        assert!(validate_color(Some("#12345".into())).is_err());
        assert!(validate_color(Some("#12345g".into())).is_err());
    }

    #[tokio::test]
    async fn create_and_list_with_counts() {
        let pool = test_pool().await;
        create_tag(&pool, request("Roguelike", Some("#aa0000"))).await.unwrap();
        create_tag(&pool, request("cozy", None)).await.unwrap();

        let tags = list_tags(&pool).await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "cozy");
        assert_eq!(tags[1].color.as_deref(), Some("#aa0000"));
        assert!(tags.iter().all(|t| t.game_count == 0));
    }

    #[tokio::test]
    async fn get_or_create_reuses_existing_ignoring_case() {
        let pool = test_pool().await;
        let existing = create_tag(&pool, request("Indie", None)).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let found = get_or_create_tag(&mut conn, "INDIE").await.unwrap();
        let created = get_or_create_tag(&mut conn, "Puzzle").await.unwrap();
        drop(conn);

        assert_eq!(found.id, existing.id);
        assert_eq!(created.name, "Puzzle");
        assert_eq!(list_tags(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_renames_and_clears_color() {
        let pool = test_pool().await;
        let tag = create_tag(&pool, request("Co-op", Some("#00ff00"))).await.unwrap();

        let updated = update_tag(
            &pool,
            tag.id,
            UpdateTagRequest {
                name: Some("Couch co-op".into()),
                color: Some(String::new()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Couch co-op");
        assert_eq!(updated.color, None);

        let err = update_tag(&pool, Uuid::new_v4(), UpdateTagRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TagNotFound));
    }

    #[tokio::test]
    async fn renaming_onto_existing_name_conflicts() {
        let pool = test_pool().await;
        create_tag(&pool, request("Horror", None)).await.unwrap();
        let other = create_tag(&pool, request("Spooky", None)).await.unwrap();

        let err = update_tag(
            &pool,
            other.id,
            UpdateTagRequest {
                name: Some("horror".into()),
                color: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
