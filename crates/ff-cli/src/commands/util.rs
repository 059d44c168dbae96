//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use ff_core::TaskId;
use ff_db::{Database, DbError};

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(in\s+)?(\d+)\s+(minute|hour|day|week)s?(\s+ago)?$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative future: "in 2 days", "in 30 minutes"
/// - Relative past: "2 hours ago", "1 week ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    // Try ISO 8601 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s.trim()) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., 'in 2 days', '2 hours ago')"
        );
    };

    let future = caps.get(1).is_some();
    let past = caps.get(4).is_some();
    if future == past {
        anyhow::bail!("Relative time needs exactly one of a leading 'in' or a trailing 'ago': {s}");
    }

    let n: i64 = caps[2]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[3] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[3]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(if future { now + duration } else { now - duration })
}

/// Resolves a task ID that may be a unique prefix of a stored ID.
pub fn resolve_task_id(db: &Database, id: &str) -> anyhow::Result<TaskId> {
    let full = TaskId::new(id)?;
    match db.get_task(&full) {
        Ok(task) => return Ok(task.id),
        Err(DbError::TaskNotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    let matches: Vec<TaskId> = db
        .list_tasks(None)?
        .into_iter()
        .filter(|t| t.id.as_str().starts_with(id))
        .map(|t| t.id)
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.clone()),
        [] => anyhow::bail!("task not found: {id}"),
        _ => anyhow::bail!("task ID prefix is ambiguous: {id}"),
    }
}

/// Shortens an ID for table display.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn parses_iso_8601() {
        let parsed = parse_datetime("2026-01-15T10:30:00Z", t0()).unwrap();
        assert_eq!(parsed, "2026-01-15T10:30:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn parses_relative_future() {
        assert_eq!(
            parse_datetime("in 2 days", t0()).unwrap(),
            t0() + Duration::days(2)
        );
        assert_eq!(
            parse_datetime("in 30 minutes", t0()).unwrap(),
            t0() + Duration::minutes(30)
        );
    }

    #[test]
    fn parses_relative_past() {
        assert_eq!(
            parse_datetime("2 hours ago", t0()).unwrap(),
            t0() - Duration::hours(2)
        );
        assert_eq!(
            parse_datetime("1 week ago", t0()).unwrap(),
            t0() - Duration::weeks(1)
        );
    }

    #[test]
    fn rejects_garbage_and_ambiguous_forms() {
        assert!(parse_datetime("soon", t0()).is_err());
        assert!(parse_datetime("2 days", t0()).is_err());
        assert!(parse_datetime("in 2 days ago", t0()).is_err());
        assert!(parse_datetime("in 999999999999 weeks", t0()).is_err());
    }

    #[test]
    fn short_id_truncates_long_ids() {
        assert_eq!(short_id("abcdefgh-1234"), "abcdefgh");
        assert_eq!(short_id("abc"), "abc");
    }
}
