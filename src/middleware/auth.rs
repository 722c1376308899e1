//! Access token middleware.
//!
//! When `API_TOKEN` is configured this middleware intercepts every `/api/v1` request to:
//! 1. Extract the token from the Authorization header
//! 2. Hash it and compare it with the hash of the configured token
//! 3. Reject mismatches with HTTP 401
//!
//! Without a configured token every request passes through.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    state::{AppState, hash_token},
};

/// Access token middleware function.
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Bearer abc123xyz
/// ```
///
/// # Returns
///
/// - `Ok(Response)` if no token is configured or the token matches (calls next handler)
/// - `Err(AppError::Unauthorized)` otherwise (returns 401)
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.api_token_hash.as_deref() else {
        return Ok(next.run(request).await);
    };

    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    // Digests, not raw tokens
    if hash_token(token.trim()) != expected {
        tracing::warn!("Rejected request with wrong access token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
