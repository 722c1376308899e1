//! Tag HTTP handlers.
//!
//! - GET /api/v1/tags - List tags with game counts
//! - POST /api/v1/tags - Create a tag
//! - PATCH /api/v1/tags/:id - Rename or recolor a tag
//! - DELETE /api/v1/tags/:id - Delete a tag

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::tag::{CreateTagRequest, Tag, TagSummary, UpdateTagRequest},
    services::tag_service,
};

pub async fn list_tags(State(pool): State<DbPool>) -> Result<Json<Vec<TagSummary>>, AppError> {
    Ok(Json(tag_service::list_tags(&pool).await?))
}

/// Create a tag.
///
/// # Request Body
///
/// ```json
/// { "name": "Couch co-op", "color": "#ff8800" }
/// ```
///
/// # Response
///
/// - **201 Created**: The new tag
/// - **400**: Blank name or color not in `#rrggbb` form
/// - **409**: A tag with that name already exists
pub async fn create_tag(
    State(pool): State<DbPool>,
    Json(request): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tag = tag_service::create_tag(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn update_tag(
    State(pool): State<DbPool>,
    Path(tag_id): Path<Uuid>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(tag_service::update_tag(&pool, tag_id, request).await?))
}

pub async fn delete_tag(
    State(pool): State<DbPool>,
    Path(tag_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tag_service::delete_tag(&pool, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
