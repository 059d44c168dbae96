//! Status command: the ongoing session and the next due task.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use ff_core::{
    TaskStatus, compute_duration, compute_effectiveness, compute_time_left, format_time_left,
    relative_time,
};
use ff_db::Database;

use crate::commands::util::short_id;

pub fn run<W: Write>(writer: &mut W, db: &Database, now: DateTime<Utc>) -> Result<()> {
    match db.ongoing_session()? {
        Some(session) => {
            // Treat "now" as a provisional end to measure elapsed time.
            let elapsed = compute_duration(session.start_at, Some(now)).unwrap_or(0);
            let elapsed_u32 = u32::try_from(elapsed.max(0)).unwrap_or(u32::MAX);
            let pct = compute_effectiveness(session.planned_mins, Some(elapsed_u32)).unwrap_or(0);
            writeln!(
                writer,
                "Session {} running: {elapsed} of {} min ({pct}%)",
                short_id(session.id.as_str()),
                session.planned_mins
            )?;
        }
        None => writeln!(writer, "No session running.")?,
    }

    let next_due = db
        .list_tasks(None)?
        .into_iter()
        .filter(|task| task.status != TaskStatus::Done && task.due_at.is_some())
        .min_by_key(|task| task.due_at);
    match next_due {
        Some(task) => {
            let left = format_time_left(compute_time_left(task.due_at, now)).unwrap_or_default();
            writeln!(
                writer,
                "Next due: {} ({}, due {})",
                task.title,
                left,
                relative_time(task.due_at, now)
            )?;
        }
        None => writeln!(writer, "No upcoming due dates.")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use ff_core::{FocusSession, PlannedMins, SessionId, SessionKind, Task, TaskId, TaskKind, TaskPriority};

    use super::*;

    fn t0() -> DateTime<Utc> {
        "2025-06-01T09:00:00Z".parse().unwrap()
    }

    fn insert_task(db: &Database, id: &str, due_in: chrono::Duration, status: TaskStatus) {
        db.insert_task(&Task {
            id: TaskId::new(id).unwrap(),
            title: format!("Task {id}"),
            description: None,
            kind: TaskKind::Task,
            status,
            priority: TaskPriority::Medium,
            tags: vec![],
            due_at: Some(t0() + due_in),
            estimate_hrs: None,
            spent_hrs: None,
            created_at: t0(),
            updated_at: t0(),
        })
        .unwrap();
    }

    #[test]
    fn reports_idle_state() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, t0()).unwrap();

        let output = String::from_utf8(output).unwrap();
        insta::assert_snapshot!(output, @r"
        No session running.
        No upcoming due dates.
        ");
    }

    #[test]
    fn reports_elapsed_share_of_plan() {
        let db = Database::open_in_memory().unwrap();
        db.insert_session(&FocusSession {
            id: SessionId::new("session-1").unwrap(),
            task_id: None,
            start_at: t0(),
            end_at: None,
            kind: SessionKind::Pomodoro,
            planned_mins: PlannedMins::new(25).unwrap(),
            actual_mins: None,
            notes: None,
            created_at: t0(),
            updated_at: t0(),
        })
        .unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, t0() + Duration::minutes(10)).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("10 of 25 min (40%)"), "got {output}");
    }

    #[test]
    fn picks_earliest_unfinished_due_task() {
        let db = Database::open_in_memory().unwrap();
        insert_task(&db, "far", Duration::days(3), TaskStatus::Todo);
        insert_task(&db, "near", Duration::hours(2), TaskStatus::Todo);
        insert_task(&db, "done", Duration::hours(1), TaskStatus::Done);

        let mut output = Vec::new();
        run(&mut output, &db, t0()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Task near"), "got {output}");
        assert!(output.contains("2h 0m left"), "got {output}");
        assert!(output.contains("due in 2 hours"), "got {output}");
    }
}
