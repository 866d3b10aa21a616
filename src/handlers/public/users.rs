// handlers/public/users.rs - anonymous user create
//
// POST /users predates the session endpoints and is kept for clients
// that provision accounts without opening a session. The password is
// hashed exactly like signup.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::database::models::user::SignupRequest;
use crate::error::ApiError;
use crate::SharedState;

/// POST /users - Create a user without issuing tokens
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
