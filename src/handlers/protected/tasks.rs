// handlers/protected/tasks.rs - task CRUD, filters, and assignment

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::task::{AssignUserRequest, CreateTaskRequest, UpdateTaskRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateAssignedQuery {
    pub date_assigned: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDueQuery {
    pub date_due: String,
}

/// GET /tasks - Tasks linked to the authenticated user
pub async fn list(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.tasks.list_for_user(user.id).await?;
    Ok(Json(tasks))
}

/// POST /tasks - Create a task owned by the authenticated user
///
/// `status` defaults to Pending; enum and date fields are validated
/// before anything is written.
pub async fn create(
    State(state): State<SharedState>,
    user: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let task = state.tasks.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/status?status=... - Global exact-match status filter
pub async fn by_status(
    State(state): State<SharedState>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.tasks.by_status(&query.status).await?;
    Ok(Json(tasks))
}

/// GET /tasks/category?category=... - Global exact-match category filter
pub async fn by_category(
    State(state): State<SharedState>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.tasks.by_category(&query.category).await?;
    Ok(Json(tasks))
}

/// GET /tasks/dateAssigned?dateAssigned=... - Calendar-day filter
pub async fn by_date_assigned(
    State(state): State<SharedState>,
    Query(query): Query<DateAssignedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.tasks.by_date_assigned(&query.date_assigned).await?;
    Ok(Json(tasks))
}

/// GET /tasks/dateDue?dateDue=... - Calendar-day filter
pub async fn by_date_due(
    State(state): State<SharedState>,
    Query(query): Query<DateDueQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.tasks.by_date_due(&query.date_due).await?;
    Ok(Json(tasks))
}

/// GET /tasks/:id
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.tasks.get(id).await?;
    Ok(Json(task))
}

/// PUT /tasks/:id - Partial update; only supplied fields change
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.tasks.update(id, req).await?;
    Ok(Json(task))
}

/// DELETE /tasks/:id - Delete the task and all of its membership edges
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.tasks.delete(id).await?;
    Ok(Json(confirmation))
}

/// POST /tasks/:id/users - Link an additional user to the task
///
/// Idempotent: assigning an already-linked user keeps exactly one edge.
pub async fn assign_user(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.tasks.assign_user(id, req.user_id).await?;
    Ok(Json(task))
}

/// DELETE /tasks/:id/users/:user_id - Remove a user's membership edge
pub async fn unassign_user(
    State(state): State<SharedState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.tasks.unassign_user(id, user_id).await?;
    Ok(Json(task))
}
