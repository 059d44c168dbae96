//! CLI subcommand implementations.

pub mod export;
pub mod profile;
pub mod session;
pub mod settings;
pub mod status;
pub mod task;
pub mod util;
pub mod wipe;
