// handlers/public/auth/register.rs - POST /signup handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::database::models::user::SignupRequest;
use crate::error::ApiError;
use crate::SharedState;

/// POST /signup - Create a user account and open its first session
///
/// Expected input:
/// ```json
/// {
///   "name": "Ana",
///   "email": "ana@x.com",
///   "password": "pw123",
///   "phoneNumber": "555-0100",   // optional
///   "location": "Kyiv"           // optional
/// }
/// ```
///
/// Returns 201 with the public user projection plus `access_token` and
/// `refresh_token`. Fails 400 on missing fields, 409 on a duplicate email.
pub async fn signup(
    State(state): State<SharedState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let response = state.sessions.signup(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
