// handlers/protected/habits.rs - habit CRUD and filters

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::habit::{CreateHabitRequest, UpdateHabitRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayQuery {
    pub habit_days: String,
}

/// GET /habits - Habits linked to the authenticated user
pub async fn list(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let habits = state.habits.list_for_user(user.id).await?;
    Ok(Json(habits))
}

/// POST /habits - Create a habit owned by the authenticated user
///
/// Requires a title, a color, and a non-empty set of valid weekdays.
pub async fn create(
    State(state): State<SharedState>,
    user: AuthUser,
    Json(req): Json<CreateHabitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let habit = state.habits.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

/// GET /habits/status?status=... - Global exact-match status filter
pub async fn by_status(
    State(state): State<SharedState>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let habits = state.habits.by_status(&query.status).await?;
    Ok(Json(habits))
}

/// GET /habits/days?habitDays=... - Habits applying to the given weekday
pub async fn by_day(
    State(state): State<SharedState>,
    Query(query): Query<DayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let habits = state.habits.by_day(&query.habit_days).await?;
    Ok(Json(habits))
}

/// GET /habits/:id
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let habit = state.habits.get(id).await?;
    Ok(Json(habit))
}

/// PUT /habits/:id - Partial update; a supplied day set must be valid
/// and non-empty
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateHabitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let habit = state.habits.update(id, req).await?;
    Ok(Json(habit))
}

/// DELETE /habits/:id - Delete the habit and all of its membership edges
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.habits.delete(id).await?;
    Ok(Json(confirmation))
}
