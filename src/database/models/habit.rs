use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "habit_status")]
pub enum HabitStatus {
    Planned,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Canceled,
}

impl HabitStatus {
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

/// Weekday a habit applies to, stored as a Postgres enum array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "habit_day")]
pub enum HabitDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl sqlx::postgres::PgHasArrayType for HabitDay {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_habit_day")
    }
}

impl HabitDay {
    pub const VALUES: &'static [&'static str] = &[
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "Sunday" => Ok(Self::Sunday),
            "Monday" => Ok(Self::Monday),
            "Tuesday" => Ok(Self::Tuesday),
            "Wednesday" => Ok(Self::Wednesday),
            "Thursday" => Ok(Self::Thursday),
            "Friday" => Ok(Self::Friday),
            "Saturday" => Ok(Self::Saturday),
            _ => Err(ApiError::validation(format!(
                "Invalid day '{}'. Valid days are: {}",
                raw,
                Self::VALUES.join(", ")
            ))),
        }
    }

    /// Parse a day set: every literal must be valid, the set must be
    /// non-empty, and duplicates collapse to one entry.
    pub fn parse_days(raw: &[String]) -> Result<Vec<HabitDay>, ApiError> {
        if raw.is_empty() {
            return Err(ApiError::validation(
                "Please provide at least one habit day.",
            ));
        }
        let mut days = Vec::new();
        for value in raw {
            let day = Self::parse(value)?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        Ok(days)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Habit {
    pub id: i64,
    pub title: String,
    pub color: String,
    pub status: HabitStatus,
    pub habit_days: Vec<HabitDay>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitResponse {
    pub id: i64,
    pub title: String,
    pub color: String,
    pub users: Vec<i64>,
    pub status: HabitStatus,
    pub habit_days: Vec<HabitDay>,
}

impl HabitResponse {
    pub fn from_habit(habit: &Habit, users: Vec<i64>) -> Self {
        Self {
            id: habit.id,
            title: habit.title.clone(),
            color: habit.color.clone(),
            users,
            status: habit.status,
            habit_days: habit.habit_days.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, message = "Please provide a title for the habit."))]
    pub title: String,

    #[validate(length(min = 1, message = "Please provide a color for the habit."))]
    pub color: String,

    pub status: Option<String>,

    #[serde(default)]
    pub habit_days: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    pub title: Option<String>,
    pub color: Option<String>,
    pub status: Option<String>,
    pub habit_days: Option<Vec<String>>,
}
