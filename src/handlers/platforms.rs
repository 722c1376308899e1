//! Platform HTTP handlers.
//!
//! - GET /api/v1/platforms - List platforms
//! - POST /api/v1/platforms - Create a platform
//! - DELETE /api/v1/platforms/:id - Delete a platform

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
    models::platform::{CreatePlatformRequest, Platform},
    services::platform_service,
};

pub async fn list_platforms(State(pool): State<DbPool>) -> Result<Json<Vec<Platform>>, AppError> {
    Ok(Json(platform_service::list_platforms(&pool).await?))
}

/// Create a platform.
///
/// # Response
///
/// - **201 Created**: The new platform
/// - **409**: A platform with that name already exists
pub async fn create_platform(
    State(pool): State<DbPool>,
    Json(request): Json<CreatePlatformRequest>,
) -> Result<impl IntoResponse, AppError> {
    let platform = platform_service::create_platform(&pool, &request.name).await?;
    Ok((StatusCode::CREATED, Json(platform)))
}

pub async fn delete_platform(
    State(pool): State<DbPool>,
    Path(platform_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    platform_service::delete_platform(&pool, platform_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
