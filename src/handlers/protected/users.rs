// handlers/protected/users.rs - user profile CRUD

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::database::models::user::UpdateUserRequest;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::SharedState;

/// GET /users - List all users (public projections)
pub async fn list(
    State(state): State<SharedState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// GET /users/:id - Get a user by id
pub async fn get(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}

/// PUT /users/:id - Partially update the caller's own profile
///
/// Fails 403 when targeting another user, 409 when the new email is
/// already registered.
pub async fn update(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let updated = state.users.update(id, &user, req).await?;
    Ok(Json(updated))
}

/// DELETE /users/:id - Delete the caller's own account
///
/// Detaches the user from every linked task/goal/habit and deletes its
/// notes; shared items persist for their remaining members.
pub async fn remove(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.users.delete(id, &user).await?;
    Ok(Json(confirmation))
}
