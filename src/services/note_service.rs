//! Note CRUD. Notes are exclusively owned; mutations by anyone but the
//! owner are rejected.

use sqlx::PgPool;

use crate::database::models::note::{CreateNoteRequest, Note, NoteResponse, UpdateNoteRequest};
use crate::database::models::parse_optional_datetime;
use crate::database::models::user::MessageResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;

pub struct NoteService {
    pool: PgPool,
}

impl NoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: i64, req: CreateNoteRequest) -> Result<NoteResponse, ApiError> {
        let date_created = parse_optional_datetime("dateCreated", &req.date_created)?;
        let date_updated = parse_optional_datetime("dateUpdated", &req.date_updated)?;

        let note: Note = sqlx::query_as(
            r#"
            INSERT INTO notes (user_id, title, content, folder_id, date_created, date_updated)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.folder_id)
        .bind(date_created)
        .bind(date_updated)
        .fetch_one(&self.pool)
        .await?;

        Ok(NoteResponse::from(note))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<NoteResponse>, ApiError> {
        let notes: Vec<Note> =
            sqlx::query_as("SELECT * FROM notes WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<NoteResponse, ApiError> {
        Ok(NoteResponse::from(self.fetch(id).await?))
    }

    /// Partial update; fields absent from the payload keep their values,
    /// including both timestamps.
    pub async fn update(
        &self,
        id: i64,
        current: &AuthUser,
        req: UpdateNoteRequest,
    ) -> Result<NoteResponse, ApiError> {
        let date_updated = parse_optional_datetime("dateUpdated", &req.date_updated)?;

        let note = self.fetch(id).await?;
        if note.user_id != current.id {
            return Err(ApiError::forbidden("Cannot modify another user's note"));
        }

        let note: Note = sqlx::query_as(
            r#"
            UPDATE notes SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                folder_id = COALESCE($4, folder_id),
                date_updated = COALESCE($5, date_updated)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.folder_id)
        .bind(date_updated)
        .fetch_one(&self.pool)
        .await?;

        Ok(NoteResponse::from(note))
    }

    pub async fn delete(&self, id: i64, current: &AuthUser) -> Result<MessageResponse, ApiError> {
        let note = self.fetch(id).await?;
        if note.user_id != current.id {
            return Err(ApiError::forbidden("Cannot delete another user's note"));
        }

        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(MessageResponse::new("Note deleted"))
    }

    async fn fetch(&self, id: i64) -> Result<Note, ApiError> {
        let note: Option<Note> = sqlx::query_as("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        note.ok_or_else(|| ApiError::not_found("Note not found"))
    }
}
