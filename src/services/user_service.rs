//! User profile CRUD and the user-delete cascade.

use sqlx::PgPool;

use crate::auth::password;
use crate::database::models::user::{
    MessageResponse, SignupRequest, UpdateUserRequest, User, UserResponse,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::link_service::{ItemKind, LinkService};

pub struct UserService {
    pool: PgPool,
    links: LinkService,
}

impl UserService {
    pub fn new(pool: PgPool, links: LinkService) -> Self {
        Self { pool, links }
    }

    async fn response(&self, user: &User) -> Result<UserResponse, ApiError> {
        let tasks = self.links.item_ids(ItemKind::Task, user.id).await?;
        Ok(UserResponse::from_user(user, tasks))
    }

    /// Anonymous create, kept from the pre-authentication API surface.
    /// The password is hashed exactly like signup; no session is opened.
    pub async fn create(&self, req: SignupRequest) -> Result<UserResponse, ApiError> {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(ApiError::conflict("User with this email already exists."));
        }

        let password_hash = password::hash_password(&req.password)?;
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (name, email, password_hash, phone_number, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(&password_hash)
        .bind(&req.phone_number)
        .bind(&req.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserResponse::from_user(&user, vec![]))
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, ApiError> {
        let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut responses = Vec::with_capacity(users.len());
        for user in &users {
            responses.push(self.response(user).await?);
        }
        Ok(responses)
    }

    pub async fn get(&self, id: i64) -> Result<UserResponse, ApiError> {
        let user = self.fetch(id).await?;
        self.response(&user).await
    }

    /// Partial self-update. Email changes re-check uniqueness.
    pub async fn update(
        &self,
        id: i64,
        current: &AuthUser,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        if current.id != id {
            return Err(ApiError::forbidden("Cannot modify another user's profile"));
        }

        let existing = self.fetch(id).await?;

        if let Some(email) = &req.email {
            if email != &existing.email {
                let clash: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM users WHERE email = $1")
                        .bind(email)
                        .fetch_optional(&self.pool)
                        .await?;
                if clash.is_some() {
                    return Err(ApiError::conflict("User with this email already exists."));
                }
            }
        }

        let user: User = sqlx::query_as(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone_number = COALESCE($4, phone_number),
                location = COALESCE($5, location),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone_number)
        .bind(&req.location)
        .fetch_one(&self.pool)
        .await?;

        self.response(&user).await
    }

    /// Self-delete. Memberships are detached and owned notes removed in
    /// the same transaction as the row delete; shared items persist.
    pub async fn delete(&self, id: i64, current: &AuthUser) -> Result<MessageResponse, ApiError> {
        if current.id != id {
            return Err(ApiError::forbidden("Cannot delete another user's profile"));
        }

        self.fetch(id).await?;

        let mut tx = self.pool.begin().await?;
        self.links.cascade_on_user_delete(&mut tx, id).await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = id, "user deleted");
        Ok(MessageResponse::new("User deleted"))
    }

    async fn fetch(&self, id: i64) -> Result<User, ApiError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        user.ok_or_else(|| ApiError::not_found("User not found"))
    }
}
