use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ff_cli::commands::{export, profile, session, settings, status, task, wipe};
use ff_cli::{Cli, Commands, Config, ProfileAction, SessionAction, SettingsAction, TaskAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<ff_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    ff_db::Database::open(&config.database_path).context("failed to open database")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let db = open_database(cli.config.as_deref())?;
    let now = Utc::now();
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    match command {
        Commands::Task { action } => match action {
            TaskAction::Add(args) => task::add(&mut writer, args, &db, now)?,
            TaskAction::List(args) => task::list(&mut writer, args, &db, now)?,
            TaskAction::Show { id, json } => task::show(&mut writer, id, *json, &db, now)?,
            TaskAction::Edit(args) => task::edit(&mut writer, args, &db, now)?,
            TaskAction::Done { id } => task::done(&mut writer, id, &db, now)?,
            TaskAction::Delete { id } => task::delete(&mut writer, id, &db)?,
        },
        Commands::Session { action } => match action {
            SessionAction::Start(args) => session::start(&mut writer, args, &db, now)?,
            SessionAction::Finish { actual } => session::finish(&mut writer, *actual, &db, now)?,
            SessionAction::Cancel => session::cancel(&mut writer, &db)?,
            SessionAction::List { json } => session::list(&mut writer, *json, &db)?,
        },
        Commands::Status => status::run(&mut writer, &db, now)?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => profile::show(&mut writer, &db)?,
            ProfileAction::Set { name, email } => {
                profile::set(&mut writer, name.as_deref(), email.as_deref(), &db)?;
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => settings::show(&mut writer, &db)?,
            SettingsAction::Set { key, value } => settings::set(&mut writer, key, value, &db)?,
        },
        Commands::Export => export::run(&mut writer, &db)?,
        Commands::Wipe { yes } => wipe::run(&mut writer, *yes, &db)?,
    }

    writer.flush()?;
    Ok(())
}
