//! Time math for derived task and session metrics.
//!
//! All functions are pure: the current time is always passed in as `now`,
//! never read from a clock. The canonical internal unit is milliseconds
//! (via [`chrono::Duration`]); fractional hours appear only at entry and
//! formatting boundaries.
//!
//! Absent inputs and out-of-domain business values (overdue dates, more
//! hours spent than estimated) are never errors. They map to `None` or to
//! a defined fallback value.

use chrono::{DateTime, Duration, Utc};

use crate::types::PlannedMins;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Computes the estimated completion time for a task.
///
/// `None` if either input is absent, non-finite, the estimate is not
/// positive, or the spent hours are negative. When the spent hours meet or
/// exceed the estimate (including overruns) the task counts as already
/// complete and the ETA is `now`.
#[must_use]
pub fn compute_eta(
    estimate_hrs: Option<f64>,
    spent_hrs: Option<f64>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let estimate = estimate_hrs?;
    let spent = spent_hrs?;

    if !estimate.is_finite() || !spent.is_finite() || estimate <= 0.0 || spent < 0.0 {
        return None;
    }

    let remaining = estimate - spent;
    if remaining <= 0.0 {
        // Already complete (or overrun): the best estimate is "now".
        return Some(now);
    }

    Some(now + Duration::milliseconds(hours_to_ms(remaining)))
}

/// Computes the signed time remaining until a due date.
///
/// Negative means overdue. `None` if no due date is set.
#[must_use]
pub fn compute_time_left(due_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Duration> {
    Some(due_at? - now)
}

/// Returns whether a due date has passed.
#[must_use]
pub fn is_overdue(due_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due_at.is_some_and(|due| now > due)
}

/// Formats a signed time-left value as a short human string.
///
/// Non-negative values render as `"{d}d {h}h {m}m left"` and negative ones
/// as `"-{d}d {h}h {m}m overdue"`, eliding leading zero components down to
/// `"{m}m left"` / `"-{m}m overdue"`.
#[must_use]
pub fn format_time_left(time_left: Option<Duration>) -> Option<String> {
    let ms = time_left?.num_milliseconds();
    let overdue = ms < 0;
    let abs = ms.abs();

    let days = abs / MS_PER_DAY;
    let hours = (abs % MS_PER_DAY) / MS_PER_HOUR;
    let mins = (abs % MS_PER_HOUR) / MS_PER_MINUTE;

    let formatted = if overdue {
        if days > 0 {
            format!("-{days}d {hours}h {mins}m overdue")
        } else if hours > 0 {
            format!("-{hours}h {mins}m overdue")
        } else {
            format!("-{mins}m overdue")
        }
    } else if days > 0 {
        format!("{days}d {hours}h {mins}m left")
    } else if hours > 0 {
        format!("{hours}h {mins}m left")
    } else {
        format!("{mins}m left")
    };

    Some(formatted)
}

/// Computes a finished session's duration in whole minutes.
///
/// `None` while the session is ongoing (`end_at` not yet recorded).
/// The duration is rounded to the nearest minute.
#[must_use]
pub fn compute_duration(start_at: DateTime<Utc>, end_at: Option<DateTime<Utc>>) -> Option<i64> {
    let ms = (end_at? - start_at).num_milliseconds();
    // Round half-up to the nearest minute.
    Some((ms + MS_PER_MINUTE / 2).div_euclid(MS_PER_MINUTE))
}

/// Computes the effectiveness percentage of a finished session.
///
/// `None` while the session is ongoing. Otherwise the actual minutes as a
/// rounded percentage of the planned minutes; 100 means the session took
/// exactly as long as planned. [`PlannedMins`] makes the zero-denominator
/// precondition violation unrepresentable.
#[must_use]
pub fn compute_effectiveness(planned: PlannedMins, actual_mins: Option<u32>) -> Option<u32> {
    let actual = u64::from(actual_mins?);
    let planned = u64::from(planned.get());

    let percent = (200 * actual + planned) / (2 * planned);
    Some(u32::try_from(percent).unwrap_or(u32::MAX))
}

/// Formats a duration given in fractional hours as a long human string.
///
/// Non-positive or NaN input renders as `"0 minutes"`. Otherwise the value
/// decomposes into days, hours, and minutes, with zero components omitted
/// and units pluralized, e.g. `"1 hour, 30 minutes"`.
#[must_use]
pub fn format_duration(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return "0 minutes".to_string();
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "hour values are bounded by validation well below i64 minutes"
    )]
    let total_minutes = (hours * 60.0).round() as i64;
    let days = total_minutes / MINUTES_PER_DAY;
    let rem_hours = (total_minutes % MINUTES_PER_DAY) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(pluralize(days, "day"));
    }
    if rem_hours > 0 {
        parts.push(pluralize(rem_hours, "hour"));
    }
    if minutes > 0 {
        parts.push(pluralize(minutes, "minute"));
    }

    if parts.is_empty() {
        return "0 minutes".to_string();
    }
    parts.join(", ")
}

/// Formats a timestamp relative to `now`, e.g. `"in 2 days"` or
/// `"1 hour ago"`.
///
/// `None` renders as the empty string. Differences under a minute render as
/// `"now"` (future) or `"just now"` (past). Larger differences bucket into
/// the largest fitting unit of minutes, hours, or days.
#[must_use]
pub fn relative_time(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(target) = target else {
        return String::new();
    };

    let diff_secs = (target - now).num_seconds();
    let future = diff_secs >= 0;
    let abs_secs = diff_secs.abs();

    if abs_secs < 60 {
        return if future { "now" } else { "just now" }.to_string();
    }

    let minutes = abs_secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let (value, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else {
        (days, "day")
    };

    let unit = pluralize(value, unit);
    if future {
        format!("in {unit}")
    } else {
        format!("{unit} ago")
    }
}

/// Formats a count with a pluralized unit, e.g. `"1 day"`, `"2 days"`.
fn pluralize(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "hour values are bounded by validation well below i64 milliseconds"
)]
fn hours_to_ms(hours: f64) -> i64 {
    #[expect(clippy::cast_precision_loss, reason = "ms-per-hour fits in f64 exactly")]
    let ms = hours * MS_PER_HOUR as f64;
    ms.round() as i64
}
