//! Focus session records and their derived metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{compute_duration, compute_effectiveness};
use crate::types::{PlannedMins, SessionId, TaskId};

/// Kind of focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Fixed-length timer session.
    #[default]
    Pomodoro,
    /// Free-form session with a user-chosen plan.
    Custom,
}

impl SessionKind {
    /// Returns the string representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" => Ok(Self::Pomodoro),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("invalid session kind: {s}")),
        }
    }
}

/// A timed focus session, optionally linked to a task.
///
/// `end_at` and `actual_mins` stay absent while the session is ongoing;
/// derived metrics are `None` until both are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: SessionId,
    pub task_id: Option<TaskId>,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub kind: SessionKind,
    pub planned_mins: PlannedMins,
    pub actual_mins: Option<u32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FocusSession {
    /// Returns whether the session is still running.
    #[must_use]
    pub const fn is_ongoing(&self) -> bool {
        self.end_at.is_none()
    }
}

/// Derived, non-persisted metrics for a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Wall-clock length in whole minutes, once finished.
    pub duration_mins: Option<i64>,
    /// Actual minutes as a percentage of planned minutes, once finished.
    pub effectiveness_pct: Option<u32>,
}

/// Computes the derived metrics for a session.
///
/// No clock is involved: both metrics depend only on the recorded
/// timestamps and minute counts.
#[must_use]
pub fn compute_session_metrics(session: &FocusSession) -> SessionMetrics {
    SessionMetrics {
        duration_mins: compute_duration(session.start_at, session.end_at),
        effectiveness_pct: compute_effectiveness(session.planned_mins, session.actual_mins),
    }
}
