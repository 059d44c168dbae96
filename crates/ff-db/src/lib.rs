//! Storage layer for FocusFlow.
//!
//! Provides persistence for tasks, focus sessions, and the user profile
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` instance can be moved between threads but cannot
//! be shared across threads without external synchronization.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format (e.g.,
//! `2024-01-15T10:30:00Z`), so lexicographic ordering matches chronological
//! ordering and values stay human-readable. Task tags and profile settings
//! are stored as JSON text.
//!
//! Derived metrics (ETA, time left, duration, effectiveness) are never
//! persisted; callers recompute them from the records after every read.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use ff_core::{
    FocusSession, PlannedMins, SessionId, SessionKind, Task, TaskId, TaskKind, TaskPriority,
    TaskStatus, ValidationError,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// No task with the given ID.
    #[error("task not found: {id}")]
    TaskNotFound { id: String },
    /// No session with the given ID.
    #[error("session not found: {id}")]
    SessionNotFound { id: String },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored field failed domain validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A stored enum or count column held an unknown value.
    #[error("invalid stored value for {record_id}: {message}")]
    InvalidValue { record_id: String, message: String },
    /// Stored JSON (tags or settings) failed to parse.
    #[error("invalid stored JSON for {record_id}")]
    JsonParse {
        record_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The user's profile and free-form settings.
///
/// FocusFlow is single-user; the profile occupies a single database row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Arbitrary settings object, merged key-by-key on update.
    pub settings: Value,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: None,
            email: None,
            settings: Value::Object(Map::new()),
        }
    }
}

/// A complete dump of the user's data, for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataExport {
    pub profile: Profile,
    pub tasks: Vec<Task>,
    pub sessions: Vec<FocusSession>,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                kind TEXT NOT NULL,
                status TEXT NOT NULL,
                priority TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',
                due_at TEXT,
                estimate_hrs REAL,
                spent_hrs REAL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
            CREATE INDEX IF NOT EXISTS idx_tasks_due ON tasks(due_at);

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                task_id TEXT,
                start_at TEXT NOT NULL,
                end_at TEXT,
                kind TEXT NOT NULL,
                planned_mins INTEGER NOT NULL CHECK (planned_mins > 0),
                actual_mins INTEGER,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE SET NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_start ON sessions(start_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_task ON sessions(task_id);

            -- Single-row profile table (id is always 1)
            CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                name TEXT,
                email TEXT,
                settings TEXT NOT NULL DEFAULT '{}'
            );
            ",
        )?;
        Ok(())
    }

    // ========== Tasks ==========

    /// Inserts a new task.
    pub fn insert_task(&self, task: &Task) -> Result<(), DbError> {
        let tags = serde_json::to_string(&task.tags).map_err(|source| DbError::JsonParse {
            record_id: task.id.to_string(),
            source,
        })?;
        self.conn.execute(
            "
            INSERT INTO tasks
            (id, title, description, kind, status, priority, tags, due_at, estimate_hrs, spent_hrs, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                task.id.as_str(),
                task.title,
                task.description,
                task.kind.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                tags,
                task.due_at.map(format_timestamp),
                task.estimate_hrs,
                task.spent_hrs,
                format_timestamp(task.created_at),
                format_timestamp(task.updated_at),
            ],
        )?;
        tracing::debug!(task_id = %task.id, "task inserted");
        Ok(())
    }

    /// Fetches a single task by ID.
    pub fn get_task(&self, id: &TaskId) -> Result<Task, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
                params![id.as_str()],
                TaskRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => row.into_task(),
            None => Err(DbError::TaskNotFound { id: id.to_string() }),
        }
    }

    /// Lists tasks, newest first, optionally filtered by status.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, DbError> {
        let rows = match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE status = ? ORDER BY created_at DESC, id ASC"
                ))?;
                let rows = stmt.query_map(params![status.as_str()], TaskRow::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id ASC"
                ))?;
                let rows = stmt.query_map([], TaskRow::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Updates an existing task with the given record.
    ///
    /// The caller is responsible for bumping `updated_at` before writing.
    pub fn update_task(&self, task: &Task) -> Result<(), DbError> {
        let tags = serde_json::to_string(&task.tags).map_err(|source| DbError::JsonParse {
            record_id: task.id.to_string(),
            source,
        })?;
        let changed = self.conn.execute(
            "
            UPDATE tasks
            SET title = ?, description = ?, kind = ?, status = ?, priority = ?, tags = ?,
                due_at = ?, estimate_hrs = ?, spent_hrs = ?, updated_at = ?
            WHERE id = ?
            ",
            params![
                task.title,
                task.description,
                task.kind.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                tags,
                task.due_at.map(format_timestamp),
                task.estimate_hrs,
                task.spent_hrs,
                format_timestamp(task.updated_at),
                task.id.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(DbError::TaskNotFound {
                id: task.id.to_string(),
            });
        }
        Ok(())
    }

    /// Deletes a task by ID.
    pub fn delete_task(&self, id: &TaskId) -> Result<(), DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?", params![id.as_str()])?;
        if changed == 0 {
            return Err(DbError::TaskNotFound { id: id.to_string() });
        }
        tracing::debug!(task_id = %id, "task deleted");
        Ok(())
    }

    // ========== Sessions ==========

    /// Inserts a new focus session.
    pub fn insert_session(&self, session: &FocusSession) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO sessions
            (id, task_id, start_at, end_at, kind, planned_mins, actual_mins, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                session.id.as_str(),
                session.task_id.as_ref().map(TaskId::as_str),
                format_timestamp(session.start_at),
                session.end_at.map(format_timestamp),
                session.kind.as_str(),
                session.planned_mins.get(),
                session.actual_mins,
                session.notes,
                format_timestamp(session.created_at),
                format_timestamp(session.updated_at),
            ],
        )?;
        tracing::debug!(session_id = %session.id, "session inserted");
        Ok(())
    }

    /// Fetches a single session by ID.
    pub fn get_session(&self, id: &SessionId) -> Result<FocusSession, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?"),
                params![id.as_str()],
                SessionRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => row.into_session(),
            None => Err(DbError::SessionNotFound { id: id.to_string() }),
        }
    }

    /// Lists all sessions, newest first.
    pub fn list_sessions(&self) -> Result<Vec<FocusSession>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY start_at DESC, id ASC"
        ))?;
        let rows = stmt.query_map([], SessionRow::from_row)?;
        let rows = rows.collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(SessionRow::into_session).collect()
    }

    /// Returns the most recently started session that has no end time.
    pub fn ongoing_session(&self) -> Result<Option<FocusSession>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SESSION_COLUMNS} FROM sessions
                     WHERE end_at IS NULL ORDER BY start_at DESC LIMIT 1"
                ),
                [],
                SessionRow::from_row,
            )
            .optional()?;
        row.map(SessionRow::into_session).transpose()
    }

    /// Updates an existing session with the given record.
    pub fn update_session(&self, session: &FocusSession) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "
            UPDATE sessions
            SET task_id = ?, start_at = ?, end_at = ?, kind = ?, planned_mins = ?,
                actual_mins = ?, notes = ?, updated_at = ?
            WHERE id = ?
            ",
            params![
                session.task_id.as_ref().map(TaskId::as_str),
                format_timestamp(session.start_at),
                session.end_at.map(format_timestamp),
                session.kind.as_str(),
                session.planned_mins.get(),
                session.actual_mins,
                session.notes,
                format_timestamp(session.updated_at),
                session.id.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(DbError::SessionNotFound {
                id: session.id.to_string(),
            });
        }
        Ok(())
    }

    /// Deletes a session by ID.
    pub fn delete_session(&self, id: &SessionId) -> Result<(), DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?", params![id.as_str()])?;
        if changed == 0 {
            return Err(DbError::SessionNotFound { id: id.to_string() });
        }
        tracing::debug!(session_id = %id, "session deleted");
        Ok(())
    }

    // ========== Profile ==========

    /// Fetches the user profile, or a default one if none is stored yet.
    pub fn get_profile(&self) -> Result<Profile, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT name, email, settings FROM profile WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((name, email, settings)) = row else {
            return Ok(Profile::default());
        };
        let settings = serde_json::from_str(&settings).map_err(|source| DbError::JsonParse {
            record_id: "profile".to_string(),
            source,
        })?;
        Ok(Profile {
            name,
            email,
            settings,
        })
    }

    /// Stores the complete profile, replacing any existing row.
    pub fn set_profile(&self, profile: &Profile) -> Result<(), DbError> {
        let settings =
            serde_json::to_string(&profile.settings).map_err(|source| DbError::JsonParse {
                record_id: "profile".to_string(),
                source,
            })?;
        self.conn.execute(
            "
            INSERT INTO profile (id, name, email, settings)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email, settings = excluded.settings
            ",
            params![profile.name, profile.email, settings],
        )?;
        Ok(())
    }

    /// Sets a single settings key, merging into the existing settings object.
    pub fn set_setting(&self, key: &str, value: Value) -> Result<Profile, DbError> {
        let mut profile = self.get_profile()?;
        match profile.settings {
            Value::Object(ref mut map) => {
                map.insert(key.to_string(), value);
            }
            _ => {
                let mut map = Map::new();
                map.insert(key.to_string(), value);
                profile.settings = Value::Object(map);
            }
        }
        self.set_profile(&profile)?;
        Ok(profile)
    }

    // ========== Export / wipe ==========

    /// Produces a complete dump of the stored data.
    pub fn export_data(&self) -> Result<DataExport, DbError> {
        Ok(DataExport {
            profile: self.get_profile()?,
            tasks: self.list_tasks(None)?,
            sessions: self.list_sessions()?,
        })
    }

    /// Deletes all stored data: sessions, tasks, and the profile.
    pub fn wipe(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            DELETE FROM sessions;
            DELETE FROM tasks;
            DELETE FROM profile;
            ",
        )?;
        tracing::info!("all data wiped");
        Ok(())
    }
}

const TASK_COLUMNS: &str =
    "id, title, description, kind, status, priority, tags, due_at, estimate_hrs, spent_hrs, created_at, updated_at";

const SESSION_COLUMNS: &str =
    "id, task_id, start_at, end_at, kind, planned_mins, actual_mins, notes, created_at, updated_at";

/// Raw task row, converted to a [`Task`] after domain validation.
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    kind: String,
    status: String,
    priority: String,
    tags: String,
    due_at: Option<String>,
    estimate_hrs: Option<f64>,
    spent_hrs: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl TaskRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            kind: row.get(3)?,
            status: row.get(4)?,
            priority: row.get(5)?,
            tags: row.get(6)?,
            due_at: row.get(7)?,
            estimate_hrs: row.get(8)?,
            spent_hrs: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn into_task(self) -> Result<Task, DbError> {
        let kind: TaskKind = parse_enum(&self.id, &self.kind)?;
        let status: TaskStatus = parse_enum(&self.id, &self.status)?;
        let priority: TaskPriority = parse_enum(&self.id, &self.priority)?;
        let tags = serde_json::from_str(&self.tags).map_err(|source| DbError::JsonParse {
            record_id: self.id.clone(),
            source,
        })?;
        Ok(Task {
            id: TaskId::new(&self.id)?,
            title: self.title,
            description: self.description,
            kind,
            status,
            priority,
            tags,
            due_at: self
                .due_at
                .map(|t| parse_timestamp(&t, &self.id))
                .transpose()?,
            estimate_hrs: self.estimate_hrs,
            spent_hrs: self.spent_hrs,
            created_at: parse_timestamp(&self.created_at, &self.id)?,
            updated_at: parse_timestamp(&self.updated_at, &self.id)?,
        })
    }
}

/// Raw session row, converted to a [`FocusSession`] after domain validation.
struct SessionRow {
    id: String,
    task_id: Option<String>,
    start_at: String,
    end_at: Option<String>,
    kind: String,
    planned_mins: u32,
    actual_mins: Option<u32>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            task_id: row.get(1)?,
            start_at: row.get(2)?,
            end_at: row.get(3)?,
            kind: row.get(4)?,
            planned_mins: row.get(5)?,
            actual_mins: row.get(6)?,
            notes: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_session(self) -> Result<FocusSession, DbError> {
        let kind: SessionKind = parse_enum(&self.id, &self.kind)?;
        Ok(FocusSession {
            id: SessionId::new(&self.id)?,
            task_id: self.task_id.map(TaskId::new).transpose()?,
            start_at: parse_timestamp(&self.start_at, &self.id)?,
            end_at: self
                .end_at
                .map(|t| parse_timestamp(&t, &self.id))
                .transpose()?,
            kind,
            planned_mins: PlannedMins::new(self.planned_mins)?,
            actual_mins: self.actual_mins,
            notes: self.notes,
            created_at: parse_timestamp(&self.created_at, &self.id)?,
            updated_at: parse_timestamp(&self.updated_at, &self.id)?,
        })
    }
}

fn parse_enum<T: std::str::FromStr<Err = String>>(
    record_id: &str,
    value: &str,
) -> Result<T, DbError> {
    value.parse().map_err(|message| DbError::InvalidValue {
        record_id: record_id.to_string(),
        message,
    })
}

fn parse_timestamp(timestamp: &str, record_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;

    fn t0() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    fn sample_task(id: &str) -> Task {
        Task {
            id: TaskId::new(id).unwrap(),
            title: "Write report".to_string(),
            description: Some("quarterly".to_string()),
            kind: TaskKind::Task,
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            tags: vec!["work".to_string(), "urgent".to_string()],
            due_at: Some(t0() + Duration::hours(26)),
            estimate_hrs: Some(4.0),
            spent_hrs: Some(1.0),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn sample_session(id: &str, task_id: Option<&str>) -> FocusSession {
        FocusSession {
            id: SessionId::new(id).unwrap(),
            task_id: task_id.map(|t| TaskId::new(t).unwrap()),
            start_at: t0(),
            end_at: None,
            kind: SessionKind::Pomodoro,
            planned_mins: PlannedMins::new(25).unwrap(),
            actual_mins: None,
            notes: Some("deep work".to_string()),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[test]
    fn open_creates_schema_on_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ff.db");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.list_tasks(None).unwrap().len(), 0);
        // Re-opening an existing database is fine.
        drop(db);
        Database::open(&path).unwrap();
    }

    #[test]
    fn task_round_trips_through_storage() {
        let db = Database::open_in_memory().unwrap();
        let task = sample_task("task-1");
        db.insert_task(&task).unwrap();

        let loaded = db.get_task(&task.id).unwrap();
        assert_eq!(loaded, task);
    }

    #[test]
    fn get_task_reports_missing_id() {
        let db = Database::open_in_memory().unwrap();
        let err = db.get_task(&TaskId::new("nope").unwrap()).unwrap_err();
        assert!(matches!(err, DbError::TaskNotFound { .. }));
    }

    #[test]
    fn list_tasks_filters_by_status() {
        let db = Database::open_in_memory().unwrap();
        let mut todo = sample_task("task-1");
        todo.status = TaskStatus::Todo;
        let mut done = sample_task("task-2");
        done.status = TaskStatus::Done;
        db.insert_task(&todo).unwrap();
        db.insert_task(&done).unwrap();

        assert_eq!(db.list_tasks(None).unwrap().len(), 2);
        let filtered = db.list_tasks(Some(TaskStatus::Done)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id.as_str(), "task-2");
    }

    #[test]
    fn list_tasks_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let older = sample_task("task-old");
        let mut newer = sample_task("task-new");
        newer.created_at = t0() + Duration::hours(1);
        db.insert_task(&older).unwrap();
        db.insert_task(&newer).unwrap();

        let tasks = db.list_tasks(None).unwrap();
        assert_eq!(tasks[0].id.as_str(), "task-new");
        assert_eq!(tasks[1].id.as_str(), "task-old");
    }

    #[test]
    fn update_task_persists_changes() {
        let db = Database::open_in_memory().unwrap();
        let mut task = sample_task("task-1");
        db.insert_task(&task).unwrap();

        task.status = TaskStatus::Done;
        task.spent_hrs = Some(4.5);
        task.updated_at = t0() + Duration::hours(5);
        db.update_task(&task).unwrap();

        let loaded = db.get_task(&task.id).unwrap();
        assert_eq!(loaded.status, TaskStatus::Done);
        assert_eq!(loaded.spent_hrs, Some(4.5));
        assert_eq!(loaded.updated_at, t0() + Duration::hours(5));
    }

    #[test]
    fn update_missing_task_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let err = db.update_task(&sample_task("ghost")).unwrap_err();
        assert!(matches!(err, DbError::TaskNotFound { .. }));
    }

    #[test]
    fn delete_task_removes_row() {
        let db = Database::open_in_memory().unwrap();
        let task = sample_task("task-1");
        db.insert_task(&task).unwrap();
        db.delete_task(&task.id).unwrap();
        assert!(matches!(
            db.get_task(&task.id),
            Err(DbError::TaskNotFound { .. })
        ));
        assert!(matches!(
            db.delete_task(&task.id),
            Err(DbError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn session_round_trips_through_storage() {
        let db = Database::open_in_memory().unwrap();
        db.insert_task(&sample_task("task-1")).unwrap();
        let session = sample_session("session-1", Some("task-1"));
        db.insert_session(&session).unwrap();

        let loaded = db.get_session(&session.id).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn ongoing_session_finds_latest_unfinished() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.ongoing_session().unwrap().is_none());

        let mut finished = sample_session("session-1", None);
        finished.end_at = Some(t0() + Duration::minutes(25));
        finished.actual_mins = Some(25);
        db.insert_session(&finished).unwrap();
        assert!(db.ongoing_session().unwrap().is_none());

        let mut running = sample_session("session-2", None);
        running.start_at = t0() + Duration::hours(1);
        db.insert_session(&running).unwrap();
        let ongoing = db.ongoing_session().unwrap().unwrap();
        assert_eq!(ongoing.id.as_str(), "session-2");
    }

    #[test]
    fn update_session_records_finish() {
        let db = Database::open_in_memory().unwrap();
        let mut session = sample_session("session-1", None);
        db.insert_session(&session).unwrap();

        session.end_at = Some(t0() + Duration::minutes(30));
        session.actual_mins = Some(30);
        session.updated_at = t0() + Duration::minutes(30);
        db.update_session(&session).unwrap();

        let loaded = db.get_session(&session.id).unwrap();
        assert_eq!(loaded.actual_mins, Some(30));
        assert!(!loaded.is_ongoing());
    }

    #[test]
    fn deleting_task_detaches_sessions() {
        let db = Database::open_in_memory().unwrap();
        let task = sample_task("task-1");
        db.insert_task(&task).unwrap();
        db.insert_session(&sample_session("session-1", Some("task-1")))
            .unwrap();

        db.delete_task(&task.id).unwrap();
        let session = db.get_session(&SessionId::new("session-1").unwrap()).unwrap();
        assert_eq!(session.task_id, None);
    }

    #[test]
    fn profile_defaults_until_set() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_profile().unwrap(), Profile::default());

        let profile = Profile {
            name: Some("Dana".to_string()),
            email: Some("dana@example.com".to_string()),
            settings: json!({"theme": "dark"}),
        };
        db.set_profile(&profile).unwrap();
        assert_eq!(db.get_profile().unwrap(), profile);
    }

    #[test]
    fn set_setting_merges_keys() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("theme", json!("dark")).unwrap();
        let profile = db.set_setting("pomodoro_mins", json!(25)).unwrap();
        assert_eq!(
            profile.settings,
            json!({"theme": "dark", "pomodoro_mins": 25})
        );
    }

    #[test]
    fn export_contains_everything() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("theme", json!("dark")).unwrap();
        db.insert_task(&sample_task("task-1")).unwrap();
        db.insert_session(&sample_session("session-1", Some("task-1")))
            .unwrap();

        let export = db.export_data().unwrap();
        assert_eq!(export.tasks.len(), 1);
        assert_eq!(export.sessions.len(), 1);
        assert_eq!(export.profile.settings["theme"], "dark");

        // The export is a plain serializable document.
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["tasks"][0]["id"], "task-1");
    }

    #[test]
    fn wipe_removes_all_rows() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("theme", json!("dark")).unwrap();
        db.insert_task(&sample_task("task-1")).unwrap();
        db.insert_session(&sample_session("session-1", Some("task-1")))
            .unwrap();

        db.wipe().unwrap();

        assert!(db.list_tasks(None).unwrap().is_empty());
        assert!(db.list_sessions().unwrap().is_empty());
        assert_eq!(db.get_profile().unwrap(), Profile::default());
    }
}
