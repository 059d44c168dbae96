//! Task records and their derived metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{compute_eta, compute_time_left};
use crate::types::TaskId;

/// What kind of work item a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    #[default]
    Task,
    Exam,
    Meeting,
}

impl TaskKind {
    /// Returns the string representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Exam => "exam",
            Self::Meeting => "meeting",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(Self::Task),
            "exam" => Ok(Self::Exam),
            "meeting" => Ok(Self::Meeting),
            _ => Err(format!("invalid task kind: {s}")),
        }
    }
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    /// Returns the string representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(format!("invalid task status: {s}")),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Returns the string representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!("invalid task priority: {s}")),
        }
    }
}

/// A task record.
///
/// Hour fields are optional: a task without an estimate simply has no ETA.
/// `spent_hrs` may exceed `estimate_hrs` (overrun); derived metrics treat
/// that as "already complete", never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub kind: TaskKind,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub estimate_hrs: Option<f64>,
    pub spent_hrs: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived, non-persisted metrics for a task.
///
/// `time_left_ms` is signed milliseconds until the due date; negative means
/// overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetrics {
    pub eta: Option<DateTime<Utc>>,
    pub time_left_ms: Option<i64>,
}

/// Computes the derived metrics for a task at a given instant.
#[must_use]
pub fn compute_task_metrics(task: &Task, now: DateTime<Utc>) -> TaskMetrics {
    TaskMetrics {
        eta: compute_eta(task.estimate_hrs, task.spent_hrs, now),
        time_left_ms: compute_time_left(task.due_at, now).map(|d| d.num_milliseconds()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn t0() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    fn task(
        due_at: Option<DateTime<Utc>>,
        estimate_hrs: Option<f64>,
        spent_hrs: Option<f64>,
    ) -> Task {
        Task {
            id: TaskId::new("task-1").unwrap(),
            title: "Write report".to_string(),
            description: None,
            kind: TaskKind::Task,
            status: TaskStatus::Doing,
            priority: TaskPriority::High,
            tags: vec!["work".to_string()],
            due_at,
            estimate_hrs,
            spent_hrs,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[test]
    fn metrics_compose_eta_and_time_left() {
        let now = t0();
        let metrics = compute_task_metrics(
            &task(Some(now + Duration::hours(26)), Some(4.0), Some(1.0)),
            now,
        );
        assert_eq!(metrics.eta, Some(now + Duration::hours(3)));
        assert_eq!(metrics.time_left_ms, Some(26 * 60 * 60 * 1000));
    }

    #[test]
    fn metrics_are_absent_for_bare_task() {
        let metrics = compute_task_metrics(&task(None, None, None), t0());
        assert_eq!(metrics.eta, None);
        assert_eq!(metrics.time_left_ms, None);
    }

    #[test]
    fn overrun_task_has_eta_now() {
        let now = t0();
        let metrics = compute_task_metrics(&task(None, Some(2.0), Some(5.0)), now);
        assert_eq!(metrics.eta, Some(now));
    }

    #[test]
    fn overdue_task_has_negative_time_left() {
        let now = t0();
        let metrics = compute_task_metrics(&task(Some(now - Duration::hours(2)), None, None), now);
        assert_eq!(metrics.time_left_ms, Some(-2 * 60 * 60 * 1000));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            TaskStatus::Backlog,
            TaskStatus::Todo,
            TaskStatus::Doing,
            TaskStatus::Done,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_orders_low_to_urgent() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::High < TaskPriority::Urgent);
    }

    #[test]
    fn task_serde_uses_snake_case_enums() {
        let json = serde_json::to_value(task(None, Some(1.0), None)).unwrap();
        assert_eq!(json["kind"], "task");
        assert_eq!(json["status"], "doing");
        assert_eq!(json["priority"], "high");
    }
}
