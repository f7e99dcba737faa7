//! Week arithmetic and date formatting
//!
//! Weeks start on Sunday. Dates travel as `yyyy-MM-dd` strings in records,
//! URLs and CLI arguments.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

use crate::errors::{PlannerError, Result};

/// Storage format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default display pattern ("Jan 5")
pub const SHORT_PATTERN: &str = "%b %-d";

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

/// The seven dates of the week starting at `week_start`
pub fn week_days(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| week_start + Duration::days(i)).collect()
}

pub fn previous_week(week_start: NaiveDate) -> NaiveDate {
    week_start - Duration::weeks(1)
}

pub fn next_week(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::weeks(1)
}

pub fn is_same_week(a: NaiveDate, b: NaiveDate) -> bool {
    week_start(a) == week_start(b)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_to_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse `yyyy-MM-dd`, or the date part of an RFC 3339 timestamp
pub fn string_to_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            PlannerError::InvalidInput(format!("Invalid date '{}' (expected yyyy-MM-dd)", s))
        })
}

/// Resolve a week argument relative to `today`: `this`, `next`, `last`
/// (or `prev`), or any date in the wanted week
pub fn resolve_week(arg: &str, today: NaiveDate) -> Result<NaiveDate> {
    let current = week_start(today);
    match arg.trim().to_lowercase().as_str() {
        "" | "this" => Ok(current),
        "next" => Ok(next_week(current)),
        "last" | "prev" => Ok(previous_week(current)),
        other => string_to_date(other),
    }
}

pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}

/// "Jan 5 - Jan 11, 2025"
pub fn format_week_range(week_start: NaiveDate) -> String {
    let week_end = week_start + Duration::days(6);
    format!(
        "{} - {}",
        format_date(week_start, SHORT_PATTERN),
        format_date(week_end, "%b %-d, %Y")
    )
}
