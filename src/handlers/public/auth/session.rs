// handlers/public/auth/session.rs - login / refresh / logout / validate

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use validator::Validate;

use crate::database::models::user::{LoginRequest, MessageResponse, RefreshRequest};
use crate::error::ApiError;
use crate::middleware::extract_bearer_token;
use crate::SharedState;

/// POST /login - Authenticate and receive an access/refresh token pair
///
/// Fails 404 for an unknown email and 401 for a wrong password. A
/// successful login supersedes any previously issued refresh token.
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let response = state.sessions.login(req).await?;
    Ok(Json(response))
}

/// POST /refresh - Exchange a live refresh token for a new access token
///
/// The refresh token must be unexpired and still match the identifier
/// stored for its subject; otherwise 401.
pub async fn refresh(
    State(state): State<SharedState>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let response = state.sessions.refresh(&req.refresh_token).await?;
    Ok(Json(response))
}

/// DELETE /logout - Invalidate the refresh session
///
/// Clears the stored refresh identifier so the token family can no
/// longer be refreshed. Logging out twice is a no-op, not an error.
pub async fn logout(
    State(state): State<SharedState>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    state.sessions.logout(&req.refresh_token).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /validate-token - Check access-token liveness
///
/// Returns the embedded identity when the bearer token is structurally
/// valid, unexpired, and its subject still exists.
pub async fn validate_token(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let identity = state.sessions.validate(&token).await?;
    Ok(Json(identity))
}
