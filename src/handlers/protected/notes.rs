// handlers/protected/notes.rs - note CRUD (exclusively owned)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::database::models::note::{CreateNoteRequest, UpdateNoteRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::SharedState;

/// GET /notes - Notes owned by the authenticated user
pub async fn list(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state.notes.list_for_user(user.id).await?;
    Ok(Json(notes))
}

/// POST /notes - Create a note owned by the authenticated user
pub async fn create(
    State(state): State<SharedState>,
    user: AuthUser,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let note = state.notes.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes/:id
pub async fn get(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.notes.get(id).await?;
    Ok(Json(note))
}

/// PUT /notes/:id - Partial update; 403 on another user's note
pub async fn update(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.notes.update(id, &user, req).await?;
    Ok(Json(note))
}

/// DELETE /notes/:id - 403 on another user's note
pub async fn remove(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.notes.delete(id, &user).await?;
    Ok(Json(confirmation))
}
