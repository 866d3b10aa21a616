use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    Pending,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Canceled,
}

impl TaskStatus {
    pub const VALUES: &'static [&'static str] =
        &["Pending", "In Progress", "Completed", "Canceled"];

    /// Validating parse; the error lists the accepted literals.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "Pending" => Ok(Self::Pending),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            "Canceled" => Ok(Self::Canceled),
            _ => Err(ApiError::validation(format!(
                "Invalid status '{}'. Valid statuses are: {}",
                raw,
                Self::VALUES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_category")]
pub enum TaskCategory {
    Work,
    Home,
    Study,
    Other,
}

impl TaskCategory {
    pub const VALUES: &'static [&'static str] = &["Work", "Home", "Study", "Other"];

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "Work" => Ok(Self::Work),
            "Home" => Ok(Self::Home),
            "Study" => Ok(Self::Study),
            "Other" => Ok(Self::Other),
            _ => Err(ApiError::validation(format!(
                "Invalid category '{}'. Valid categories are: {}",
                raw,
                Self::VALUES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date_assigned: Option<DateTime<Utc>>,
    pub date_due: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub category: Option<TaskCategory>,
}

/// Wire projection: the task row plus the ids of its member users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date_assigned: Option<DateTime<Utc>>,
    pub date_due: Option<DateTime<Utc>>,
    pub users: Vec<i64>,
    pub status: TaskStatus,
    pub category: Option<TaskCategory>,
}

impl TaskResponse {
    pub fn from_task(task: &Task, users: Vec<i64>) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            date_assigned: task.date_assigned,
            date_due: task.date_due,
            users,
            status: task.status,
            category: task.category,
        }
    }
}

/// Enum and date fields arrive as raw strings and are parsed before any
/// write happens.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Please provide a title for the task."))]
    pub title: String,
    pub description: Option<String>,
    pub date_assigned: Option<String>,
    pub date_due: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_assigned: Option<String>,
    pub date_due: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRequest {
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_status_literal() {
        for raw in TaskStatus::VALUES {
            assert!(TaskStatus::parse(raw).is_ok(), "failed to parse {}", raw);
        }
        assert_eq!(TaskStatus::parse("In Progress").unwrap(), TaskStatus::InProgress);
    }

    #[test]
    fn rejects_unknown_status_listing_accepted_values() {
        let err = TaskStatus::parse("Bogus").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("Bogus"));
        assert!(err.message().contains("Pending"));
        assert!(err.message().contains("In Progress"));
    }

    #[test]
    fn status_is_case_sensitive() {
        assert!(TaskStatus::parse("pending").is_err());
    }

    #[test]
    fn rejects_unknown_category() {
        let err = TaskCategory::parse("Chores").unwrap_err();
        assert!(err.message().contains("Work"));
    }

    #[test]
    fn multi_word_status_serializes_with_space() {
        let value = serde_json::to_value(TaskStatus::InProgress).unwrap();
        assert_eq!(value, serde_json::json!("In Progress"));
    }

    #[test]
    fn projection_uses_camel_case_keys() {
        let task = Task {
            id: 5,
            title: "Buy milk".into(),
            description: None,
            date_assigned: None,
            date_due: None,
            status: TaskStatus::Pending,
            category: Some(TaskCategory::Home),
        };
        let value = serde_json::to_value(TaskResponse::from_task(&task, vec![1])).unwrap();
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["category"], "Home");
        assert!(value.get("dateAssigned").is_some());
        assert!(value.get("date_assigned").is_none());
    }
}
