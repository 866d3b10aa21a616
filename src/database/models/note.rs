use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Note row. Notes are exclusively owned by a single user.
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_updated: Option<DateTime<Utc>>,
    pub user_id: i64,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            folder_id: note.folder_id,
            date_created: note.date_created,
            date_updated: note.date_updated,
            user_id: note.user_id,
        }
    }
}

/// Timestamps may be supplied by the client; `dateCreated` defaults to
/// the insertion time when absent.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, message = "Please provide a title for the note."))]
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<i64>,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
}

/// Partial update; timestamps only move when explicitly supplied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<i64>,
    pub date_updated: Option<String>,
}
