//! FocusFlow CLI library.
//!
//! This crate provides the CLI interface for the task and focus-session
//! manager.

mod cli;
pub mod commands;
mod config;

pub use cli::{
    Cli, Commands, ProfileAction, SessionAction, SessionStartArgs, SettingsAction, TaskAction,
    TaskAddArgs, TaskEditArgs, TaskListArgs,
};
pub use config::Config;
