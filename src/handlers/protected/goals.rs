// handlers/protected/goals.rs - goal CRUD and filters

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::goal::{CreateGoalRequest, UpdateGoalRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: String,
}

/// GET /goals - Goals linked to the authenticated user
pub async fn list(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let goals = state.goals.list_for_user(user.id).await?;
    Ok(Json(goals))
}

/// POST /goals - Create a goal owned by the authenticated user
///
/// `status` defaults to Planned and `period` to Weekly.
pub async fn create(
    State(state): State<SharedState>,
    user: AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let goal = state.goals.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /goals/status?status=... - Global exact-match status filter
pub async fn by_status(
    State(state): State<SharedState>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let goals = state.goals.by_status(&query.status).await?;
    Ok(Json(goals))
}

/// GET /goals/period?period=... - Global exact-match period filter
pub async fn by_period(
    State(state): State<SharedState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let goals = state.goals.by_period(&query.period).await?;
    Ok(Json(goals))
}

/// GET /goals/:id
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let goal = state.goals.get(id).await?;
    Ok(Json(goal))
}

/// PUT /goals/:id - Partial update; only supplied fields change
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let goal = state.goals.update(id, req).await?;
    Ok(Json(goal))
}

/// DELETE /goals/:id - Delete the goal and all of its membership edges
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.goals.delete(id).await?;
    Ok(Json(confirmation))
}
