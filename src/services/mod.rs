//! Business logic services.
//!
//! Services contain the library logic separated from HTTP handlers.
//! They validate input, run queries and keep multi-statement changes in transactions.

pub mod friend_service;
pub mod game_service;
pub mod import_service;
pub mod platform_service;
pub mod shortlist_service;
pub mod tag_service;

use crate::error::AppError;

/// Trimmed, non-blank name or an `InvalidRequest` naming the field.
pub(crate) fn required_name(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}
