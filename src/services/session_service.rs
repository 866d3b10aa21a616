//! Session lifecycle: signup, login, refresh, logout, token validation.

use chrono::DateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{password, TokenIssuer};
use crate::database::models::user::{
    AuthResponse, LoginRequest, SignupRequest, TokenIdentity, TokenRefreshResponse, User,
    UserResponse,
};
use crate::error::ApiError;
use crate::services::link_service::{ItemKind, LinkService};

pub struct SessionService {
    pool: PgPool,
    tokens: TokenIssuer,
    links: LinkService,
}

impl SessionService {
    pub fn new(pool: PgPool, tokens: TokenIssuer, links: LinkService) -> Self {
        Self { pool, tokens, links }
    }

    /// Create a user with a hashed password and open its first session.
    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse, ApiError> {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(ApiError::conflict("User with this email already exists."));
        }

        let password_hash = password::hash_password(&req.password)?;
        let jti = Uuid::new_v4();

        // The row and the token issuance succeed or fail together: a
        // minting error rolls the insert back.
        let mut tx = self.pool.begin().await?;
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (name, email, password_hash, phone_number, location, refresh_token_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(&password_hash)
        .bind(&req.phone_number)
        .bind(&req.location)
        .bind(jti)
        .fetch_one(&mut *tx)
        .await?;

        let access_token = self.tokens.mint_access(&user)?;
        let refresh_token = self.tokens.mint_refresh(user.id, jti)?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "user signed up");

        Ok(AuthResponse {
            user: UserResponse::from_user(&user, vec![]),
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.access_expires_in(),
        })
    }

    /// Verify credentials and open a fresh session, superseding any
    /// previous refresh token.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await?;
        let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

        if !password::verify_password(&req.password, &user.password_hash)? {
            return Err(ApiError::auth("Invalid credentials"));
        }

        let jti = Uuid::new_v4();
        let access_token = self.tokens.mint_access(&user)?;
        let refresh_token = self.tokens.mint_refresh(user.id, jti)?;

        sqlx::query("UPDATE users SET refresh_token_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(jti)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = user.id, "user logged in");

        let tasks = self.links.item_ids(ItemKind::Task, user.id).await?;
        Ok(AuthResponse {
            user: UserResponse::from_user(&user, tasks),
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.access_expires_in(),
        })
    }

    /// Exchange a live refresh token for a new access token. The refresh
    /// token itself stays valid until the next login or logout.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRefreshResponse, ApiError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&self.pool)
            .await?;
        let user = user.ok_or_else(|| ApiError::auth("Token subject no longer exists"))?;

        if user.refresh_token_id != Some(claims.jti) {
            return Err(ApiError::auth("Refresh token is no longer active"));
        }

        let access_token = self.tokens.mint_access(&user)?;
        Ok(TokenRefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.access_expires_in(),
        })
    }

    /// Invalidate the refresh session. A token whose identifier was
    /// already cleared or superseded falls through as a no-op.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let result = sqlx::query(
            "UPDATE users SET refresh_token_id = NULL, updated_at = NOW() WHERE id = $1 AND refresh_token_id = $2",
        )
        .bind(claims.sub)
        .bind(claims.jti)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(user_id = claims.sub, "user logged out");
        }
        Ok(())
    }

    /// Check an access token and confirm its subject still exists.
    pub async fn validate(&self, access_token: &str) -> Result<TokenIdentity, ApiError> {
        let claims = self.tokens.verify_access(access_token)?;

        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, email FROM users WHERE id = $1")
                .bind(claims.sub)
                .fetch_optional(&self.pool)
                .await?;
        let (user_id, name, email) =
            row.ok_or_else(|| ApiError::auth("Token subject no longer exists"))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| ApiError::internal("Invalid token expiry"))?;

        Ok(TokenIdentity {
            user_id,
            name,
            email,
            expires_at,
        })
    }
}
