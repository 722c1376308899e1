//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::metadata::MetadataError;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing or wrong access token
/// - **Resource Errors**: Requested game, platform, tag or friend not found
/// - **Conflict Errors**: Duplicate names, game already shortlisted
/// - **Metadata Errors**: The external game database failed or is not configured
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Access token is missing or does not match.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid or missing access token")]
    Unauthorized,

    #[error("Game not found")]
    GameNotFound,

    #[error("Platform not found")]
    PlatformNotFound,

    #[error("Tag not found")]
    TagNotFound,

    #[error("Friend not found")]
    FriendNotFound,

    /// Game is not on the shortlist.
    #[error("Shortlist entry not found")]
    ShortlistEntryNotFound,

    /// The request collides with existing data.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Conflict")]
    Conflict(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// The metadata API returned an error or an unreadable response.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Metadata lookup failed: {0}")]
    Metadata(#[from] MetadataError),

    /// No metadata credentials are configured.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Metadata lookup is not configured")]
    MetadataUnavailable,

    /// The metadata database has nothing resembling the game.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("No metadata found for {0}")]
    MetadataNotFound(String),
}

/// Unique-constraint violations become `Conflict`; everything else stays a database error.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());

        if is_unique {
            AppError::Conflict("A record with that name already exists".to_string())
        } else {
            AppError::Database(err)
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Database failures return 500 and hide the underlying error from the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            AppError::GameNotFound => (StatusCode::NOT_FOUND, "game_not_found", self.to_string()),
            AppError::PlatformNotFound => {
                (StatusCode::NOT_FOUND, "platform_not_found", self.to_string())
            }
            AppError::TagNotFound => (StatusCode::NOT_FOUND, "tag_not_found", self.to_string()),
            AppError::FriendNotFound => {
                (StatusCode::NOT_FOUND, "friend_not_found", self.to_string())
            }
            AppError::ShortlistEntryNotFound => (
                StatusCode::NOT_FOUND,
                "shortlist_entry_not_found",
                self.to_string(),
            ),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Metadata(ref err) => {
                tracing::error!("Metadata error: {}", err);
                (StatusCode::BAD_GATEWAY, "metadata_error", self.to_string())
            }
            AppError::MetadataUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "metadata_unavailable",
                self.to_string(),
            ),
            AppError::MetadataNotFound(_) => {
                (StatusCode::NOT_FOUND, "metadata_not_found", self.to_string())
            }
            AppError::Database(ref err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_category() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::GameNotFound, StatusCode::NOT_FOUND),
            (AppError::ShortlistEntryNotFound, StatusCode::NOT_FOUND),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AppError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::MetadataUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (AppError::MetadataNotFound("Hades".into()), StatusCode::NOT_FOUND),
            (
                AppError::Metadata(MetadataError::Status(500)),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
