//! Task subcommands: add, list, show, edit, done, delete.
//!
//! Derived metrics are recomputed on every read and attached under a
//! `derived` key in JSON output; they are never persisted.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use ff_core::{
    Task, TaskId, TaskStatus, compute_task_metrics, compute_time_left, format_duration,
    format_time_left, relative_time, validate_hours,
};
use ff_db::Database;

use crate::cli::{TaskAddArgs, TaskEditArgs, TaskListArgs};
use crate::commands::util::{parse_datetime, resolve_task_id, short_id};

pub fn add<W: Write>(
    writer: &mut W,
    args: &TaskAddArgs,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<()> {
    let estimate_hrs = validate_hours("estimate", args.estimate)?;
    let spent_hrs = validate_hours("spent", args.spent)?;
    let due_at = args
        .due
        .as_deref()
        .map(|due| parse_datetime(due, now))
        .transpose()
        .context("invalid --due value")?;

    let task = Task {
        id: TaskId::new(Uuid::new_v4().to_string())?,
        title: args.title.clone(),
        description: args.description.clone(),
        kind: args.kind,
        status: args.status,
        priority: args.priority,
        tags: args.tags.clone(),
        due_at,
        estimate_hrs,
        spent_hrs,
        created_at: now,
        updated_at: now,
    };
    db.insert_task(&task)?;
    tracing::debug!(task_id = %task.id, "task created");

    writeln!(writer, "Added task {} ({})", short_id(task.id.as_str()), task.title)?;
    if let Some(formatted) = format_time_left(compute_time_left(task.due_at, now)) {
        writeln!(writer, "Due: {formatted}")?;
    }
    Ok(())
}

pub fn list<W: Write>(
    writer: &mut W,
    args: &TaskListArgs,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<()> {
    let tasks = db.list_tasks(args.status)?;

    if args.json {
        let values: Vec<Value> = tasks
            .iter()
            .map(|task| task_with_derived(task, now))
            .collect::<Result<_>>()?;
        serde_json::to_writer_pretty(&mut *writer, &values)?;
        writeln!(writer)?;
        return Ok(());
    }

    if tasks.is_empty() {
        writeln!(writer, "No tasks.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<10} {:<8} {:<8} {:<18} TITLE",
        "ID", "STATUS", "PRI", "DUE"
    )?;
    for task in &tasks {
        let due = format_time_left(compute_time_left(task.due_at, now))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{:<10} {:<8} {:<8} {:<18} {}",
            short_id(task.id.as_str()),
            task.status.as_str(),
            task.priority.as_str(),
            due,
            task.title
        )?;
    }
    Ok(())
}

pub fn show<W: Write>(
    writer: &mut W,
    id: &str,
    json: bool,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<()> {
    let id = resolve_task_id(db, id)?;
    let task = db.get_task(&id)?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &task_with_derived(&task, now)?)?;
        writeln!(writer)?;
        return Ok(());
    }

    let metrics = compute_task_metrics(&task, now);
    writeln!(writer, "Task {}", task.id)?;
    writeln!(writer, "  Title:    {}", task.title)?;
    if let Some(description) = &task.description {
        writeln!(writer, "  Notes:    {description}")?;
    }
    writeln!(writer, "  Kind:     {}", task.kind)?;
    writeln!(writer, "  Status:   {}", task.status)?;
    writeln!(writer, "  Priority: {}", task.priority)?;
    if !task.tags.is_empty() {
        writeln!(writer, "  Tags:     {}", task.tags.join(", "))?;
    }
    if let Some(due_at) = task.due_at {
        let left = format_time_left(compute_time_left(task.due_at, now)).unwrap_or_default();
        writeln!(writer, "  Due:      {} ({left})", due_at.to_rfc3339())?;
    }
    if let Some(estimate) = task.estimate_hrs {
        writeln!(writer, "  Estimate: {}", format_duration(estimate))?;
    }
    if let Some(spent) = task.spent_hrs {
        writeln!(writer, "  Spent:    {}", format_duration(spent))?;
    }
    if metrics.eta.is_some() {
        writeln!(writer, "  ETA:      {}", relative_time(metrics.eta, now))?;
    }
    Ok(())
}

pub fn edit<W: Write>(
    writer: &mut W,
    args: &TaskEditArgs,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<()> {
    let id = resolve_task_id(db, &args.id)?;
    let mut task = db.get_task(&id)?;

    if let Some(title) = &args.title {
        task.title.clone_from(title);
    }
    if let Some(description) = &args.description {
        task.description = Some(description.clone());
    }
    if let Some(kind) = args.kind {
        task.kind = kind;
    }
    if let Some(status) = args.status {
        task.status = status;
    }
    if let Some(priority) = args.priority {
        task.priority = priority;
    }
    if !args.tags.is_empty() {
        task.tags.clone_from(&args.tags);
    }
    if let Some(due) = args.due.as_deref() {
        task.due_at = Some(parse_datetime(due, now).context("invalid --due value")?);
    }
    if let Some(estimate) = validate_hours("estimate", args.estimate)? {
        task.estimate_hrs = Some(estimate);
    }
    if let Some(spent) = validate_hours("spent", args.spent)? {
        task.spent_hrs = Some(spent);
    }
    task.updated_at = now;
    db.update_task(&task)?;

    writeln!(writer, "Updated task {}", short_id(task.id.as_str()))?;
    Ok(())
}

pub fn done<W: Write>(writer: &mut W, id: &str, db: &Database, now: DateTime<Utc>) -> Result<()> {
    let id = resolve_task_id(db, id)?;
    let mut task = db.get_task(&id)?;
    task.status = TaskStatus::Done;
    task.updated_at = now;
    db.update_task(&task)?;

    writeln!(writer, "Done: {} ({})", short_id(task.id.as_str()), task.title)?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, id: &str, db: &Database) -> Result<()> {
    let id = resolve_task_id(db, id)?;
    db.delete_task(&id)?;
    writeln!(writer, "Deleted task {}", short_id(id.as_str()))?;
    Ok(())
}

/// Serializes a task with its derived metrics under a `derived` key.
fn task_with_derived(task: &Task, now: DateTime<Utc>) -> Result<Value> {
    let mut value = serde_json::to_value(task)?;
    let metrics = serde_json::to_value(compute_task_metrics(task, now))?;
    value
        .as_object_mut()
        .context("task serialized to a non-object")?
        .insert("derived".to_string(), metrics);
    Ok(value)
}
