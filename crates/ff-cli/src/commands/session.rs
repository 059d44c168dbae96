//! Session subcommands: start, finish, cancel, list.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use ff_core::{
    FocusSession, PlannedMins, SessionId, compute_duration, compute_session_metrics,
    relative_time,
};
use ff_db::Database;

use crate::cli::SessionStartArgs;
use crate::commands::util::{resolve_task_id, short_id};

pub fn start<W: Write>(
    writer: &mut W,
    args: &SessionStartArgs,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(ongoing) = db.ongoing_session()? {
        bail!(
            "a session is already running (started {}); finish or cancel it first",
            relative_time(Some(ongoing.start_at), now)
        );
    }

    let task_id = args
        .task
        .as_deref()
        .map(|id| resolve_task_id(db, id))
        .transpose()?;

    let session = FocusSession {
        id: SessionId::new(Uuid::new_v4().to_string())?,
        task_id,
        start_at: now,
        end_at: None,
        kind: args.kind,
        planned_mins: PlannedMins::new(args.planned)?,
        actual_mins: None,
        notes: args.notes.clone(),
        created_at: now,
        updated_at: now,
    };
    db.insert_session(&session)?;
    tracing::debug!(session_id = %session.id, "session started");

    writeln!(
        writer,
        "Started {} session {} ({} minutes planned)",
        session.kind,
        short_id(session.id.as_str()),
        session.planned_mins
    )?;
    Ok(())
}

pub fn finish<W: Write>(
    writer: &mut W,
    actual: Option<u32>,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<()> {
    let Some(mut session) = db.ongoing_session()? else {
        bail!("no ongoing session");
    };

    session.end_at = Some(now);
    let elapsed = compute_duration(session.start_at, session.end_at)
        .context("finished session must have a duration")?;
    let elapsed = u32::try_from(elapsed.max(0)).unwrap_or(u32::MAX);
    session.actual_mins = Some(actual.unwrap_or(elapsed));
    session.updated_at = now;
    db.update_session(&session)?;

    let metrics = compute_session_metrics(&session);
    writeln!(writer, "Finished session {}", short_id(session.id.as_str()))?;
    if let Some(duration) = metrics.duration_mins {
        writeln!(writer, "  Duration:      {duration} min")?;
    }
    if let Some(effectiveness) = metrics.effectiveness_pct {
        writeln!(
            writer,
            "  Effectiveness: {effectiveness}% of {} min planned",
            session.planned_mins
        )?;
    }
    Ok(())
}

pub fn cancel<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let Some(session) = db.ongoing_session()? else {
        bail!("no ongoing session");
    };
    db.delete_session(&session.id)?;
    writeln!(writer, "Cancelled session {}", short_id(session.id.as_str()))?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, json: bool, db: &Database) -> Result<()> {
    let sessions = db.list_sessions()?;

    if json {
        let values: Vec<Value> = sessions
            .iter()
            .map(session_with_derived)
            .collect::<Result<_>>()?;
        serde_json::to_writer_pretty(&mut *writer, &values)?;
        writeln!(writer)?;
        return Ok(());
    }

    if sessions.is_empty() {
        writeln!(writer, "No sessions.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<10} {:<10} {:<21} {:>7} {:>9} {:>6}",
        "ID", "KIND", "STARTED", "PLANNED", "DURATION", "EFF"
    )?;
    for session in &sessions {
        let metrics = compute_session_metrics(session);
        let duration = metrics
            .duration_mins
            .map_or_else(|| "ongoing".to_string(), |d| format!("{d}m"));
        let effectiveness = metrics
            .effectiveness_pct
            .map_or_else(|| "-".to_string(), |e| format!("{e}%"));
        writeln!(
            writer,
            "{:<10} {:<10} {:<21} {:>6}m {:>9} {:>6}",
            short_id(session.id.as_str()),
            session.kind.as_str(),
            session.start_at.format("%Y-%m-%d %H:%M").to_string(),
            session.planned_mins.get(),
            duration,
            effectiveness
        )?;
    }
    Ok(())
}

/// Serializes a session with its derived metrics under a `derived` key.
fn session_with_derived(session: &FocusSession) -> Result<Value> {
    let mut value = serde_json::to_value(session)?;
    let metrics = serde_json::to_value(compute_session_metrics(session))?;
    value
        .as_object_mut()
        .context("session serialized to a non-object")?
        .insert("derived".to_string(), metrics);
    Ok(value)
}
