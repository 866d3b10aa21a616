pub mod goal;
pub mod habit;
pub mod note;
pub mod task;
pub mod user;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ApiError;

/// Parse a date-valued request field. Accepts a full RFC 3339 timestamp,
/// a bare `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or a `YYYY-MM-DD` date
/// (taken as midnight UTC).
pub fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ApiError::validation(format!(
        "Invalid {} '{}'. Expected an ISO 8601 timestamp or a YYYY-MM-DD date.",
        field, raw
    )))
}

/// Parse an optional date-valued request field, passing `None` through.
pub fn parse_optional_datetime(
    field: &str,
    raw: &Option<String>,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        Some(s) => parse_datetime(field, s).map(Some),
        None => Ok(None),
    }
}

/// Parse a calendar-day filter value. Full timestamps are truncated to
/// their UTC day.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_datetime(field, raw).map(|dt| dt.date_naive())
}
