//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ff_core::{SessionKind, TaskKind, TaskPriority, TaskStatus};

/// Personal task and focus-session manager.
///
/// Tracks tasks with due dates and effort estimates, times focus sessions
/// against a plan, and derives ETA, time-left, and effectiveness metrics.
#[derive(Debug, Parser)]
#[command(name = "ff", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage focus sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show the ongoing session and the next due task.
    Status,

    /// Show or update the user profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Show or update free-form settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Export all data as JSON to stdout.
    Export,

    /// Delete all stored data.
    Wipe {
        /// Confirm the deletion. Without this flag, nothing is removed.
        #[arg(long)]
        yes: bool,
    },
}

/// Task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Add a new task.
    Add(TaskAddArgs),
    /// List tasks.
    List(TaskListArgs),
    /// Show a single task with derived metrics.
    Show {
        /// Task ID (or unique prefix).
        id: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Edit fields of an existing task.
    Edit(TaskEditArgs),
    /// Mark a task as done.
    Done {
        /// Task ID (or unique prefix).
        id: String,
    },
    /// Delete a task.
    Delete {
        /// Task ID (or unique prefix).
        id: String,
    },
}

/// Arguments for `ff task add`.
#[derive(Debug, Args)]
pub struct TaskAddArgs {
    /// Task title.
    pub title: String,

    /// Longer description.
    #[arg(long)]
    pub description: Option<String>,

    /// Kind of task: task, exam, or meeting.
    #[arg(long, default_value = "task")]
    pub kind: TaskKind,

    /// Initial status: backlog, todo, doing, or done.
    #[arg(long, default_value = "todo")]
    pub status: TaskStatus,

    /// Priority: low, medium, high, or urgent.
    #[arg(long, default_value = "medium")]
    pub priority: TaskPriority,

    /// Tag to attach (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Due date: ISO 8601 or relative (e.g. "in 2 days").
    #[arg(long)]
    pub due: Option<String>,

    /// Estimated effort in hours.
    #[arg(long, allow_negative_numbers = true)]
    pub estimate: Option<f64>,

    /// Hours already spent.
    #[arg(long, allow_negative_numbers = true)]
    pub spent: Option<f64>,
}

/// Arguments for `ff task list`.
#[derive(Debug, Args)]
pub struct TaskListArgs {
    /// Only show tasks with this status.
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Output as JSON with derived metrics.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `ff task edit`. Absent flags leave fields unchanged.
#[derive(Debug, Args)]
pub struct TaskEditArgs {
    /// Task ID (or unique prefix).
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub kind: Option<TaskKind>,

    #[arg(long)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub priority: Option<TaskPriority>,

    /// Replace all tags (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Due date: ISO 8601 or relative (e.g. "in 2 days").
    #[arg(long)]
    pub due: Option<String>,

    /// Estimated effort in hours.
    #[arg(long, allow_negative_numbers = true)]
    pub estimate: Option<f64>,

    /// Hours already spent.
    #[arg(long, allow_negative_numbers = true)]
    pub spent: Option<f64>,
}

/// Session subcommands.
#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Start a focus session.
    Start(SessionStartArgs),
    /// Finish the ongoing session.
    Finish {
        /// Actual focused minutes. Defaults to the wall-clock duration.
        #[arg(long)]
        actual: Option<u32>,
    },
    /// Discard the ongoing session without recording it.
    Cancel,
    /// List sessions with derived metrics.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `ff session start`.
#[derive(Debug, Args)]
pub struct SessionStartArgs {
    /// Task ID (or unique prefix) this session works on.
    #[arg(long)]
    pub task: Option<String>,

    /// Planned length in minutes (must be at least 1).
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..))]
    pub planned: u32,

    /// Session kind: pomodoro or custom.
    #[arg(long, default_value = "pomodoro")]
    pub kind: SessionKind,

    /// Free-form notes.
    #[arg(long)]
    pub notes: Option<String>,
}

/// Profile subcommands.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile.
    Show,
    /// Update profile fields.
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

/// Settings subcommands.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show all settings as JSON.
    Show,
    /// Set a single settings key. The value is parsed as JSON when possible,
    /// otherwise stored as a string.
    Set {
        /// Settings key.
        key: String,
        /// Value (JSON or plain string).
        value: String,
    },
}
