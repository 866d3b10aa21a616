use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "goal_status")]
pub enum GoalStatus {
    Planned,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Canceled,
}

impl GoalStatus {
    pub const VALUES: &'static [&'static str] =
        &["Planned", "In Progress", "Completed", "Canceled"];

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "Planned" => Ok(Self::Planned),
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
#[sqlx(type_name = "goal_period")]
pub enum GoalPeriod {
    Weekly,
    Monthly,
    Yearly,
    #[sqlx(rename = "Five Year")]
    #[serde(rename = "Five Year")]
    FiveYear,
}

impl GoalPeriod {
    pub const VALUES: &'static [&'static str] = &["Weekly", "Monthly", "Yearly", "Five Year"];

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "Weekly" => Ok(Self::Weekly),
            "Monthly" => Ok(Self::Monthly),
            "Yearly" => Ok(Self::Yearly),
            "Five Year" => Ok(Self::FiveYear),
            _ => Err(ApiError::validation(format!(
                "Invalid period '{}'. Valid periods are: {}",
                raw,
                Self::VALUES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: GoalStatus,
    pub goal_period: GoalPeriod,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub users: Vec<i64>,
    pub status: GoalStatus,
    pub goal_period: GoalPeriod,
}

impl GoalResponse {
    pub fn from_goal(goal: &Goal, users: Vec<i64>) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            description: goal.description.clone(),
            users,
            status: goal.status,
            goal_period: goal.goal_period,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, message = "Please provide a title for the goal."))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub period: Option<String>,
}
