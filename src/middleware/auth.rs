use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AccessClaims, TokenIssuer};
use crate::config;
use crate::error::ApiError;

/// Authenticated user context extracted from an access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<AccessClaims> for AuthUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// Access-token middleware that validates the Authorization header and
/// injects the user context into the request
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = validate_access_token(&token)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| ApiError::auth("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::auth("Invalid Authorization header format"))?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(ApiError::auth("Empty bearer token"));
        }
        Ok(token.to_string())
    } else {
        Err(ApiError::auth(
            "Authorization header must use Bearer token format",
        ))
    }
}

/// Validate an access token and extract its claims
fn validate_access_token(token: &str) -> Result<AccessClaims, ApiError> {
    let security = &config::config().security;
    if security.jwt_secret.is_empty() {
        return Err(ApiError::internal("JWT secret not configured"));
    }
    TokenIssuer::from_config(security).verify_access(token)
}

// Extractor form: routes behind `require_auth` read the injected context;
// mixed-auth routes fall back to validating the header directly.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = extract_bearer_token(&parts.headers)?;
        let claims = validate_access_token(&token)?;
        Ok(AuthUser::from(claims))
    }
}
