//! Core domain logic for FocusFlow.
//!
//! This crate contains the fundamental types and logic for:
//! - Time math: ETA, time-left, duration, and effectiveness calculations
//! - Task records and their derived metrics
//! - Focus session records and their derived metrics
//!
//! Every computation takes the current time as a parameter instead of
//! reading a clock, so results are deterministic and testable.

pub mod session;
pub mod task;
pub mod time;
pub mod types;

pub use session::{FocusSession, SessionKind, SessionMetrics, compute_session_metrics};
pub use task::{Task, TaskKind, TaskMetrics, TaskPriority, TaskStatus, compute_task_metrics};
pub use time::{
    compute_duration, compute_effectiveness, compute_eta, compute_time_left, format_duration,
    format_time_left, is_overdue, relative_time,
};
pub use types::{PlannedMins, SessionId, TaskId, ValidationError, validate_hours};
