//! `SQLite` task store.
//!
//! The database is stored at `~/.smartdo/tasks.db`. Timestamps are kept as
//! RFC 3339 text; priority and status as their lowercase names.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::config::Paths;
use crate::error::SmartdoError;
use crate::tasks::{NewTask, Status, Task};

use super::migrations;

const TASK_COLUMNS: &str =
    "id, title, description, due_at, priority, status, created_at, updated_at";

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open() -> Result<Self, SmartdoError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, SmartdoError> {
        let conn = Connection::open(path).map_err(|e| {
            SmartdoError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, SmartdoError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SmartdoError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<(), SmartdoError> {
        migrations::run(&self.conn)
    }

    /// Store a new task and return it with its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_task(&self, task: &NewTask) -> Result<Task, SmartdoError> {
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO tasks (title, description, due_at, due_ts, priority, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    task.title,
                    task.description,
                    task.due_at.map(|d| d.to_rfc3339()),
                    task.due_at.map(|d| d.timestamp()),
                    task.priority.as_str(),
                    Status::Pending.as_str(),
                    now,
                ],
            )
            .map_err(|e| SmartdoError::Database(format!("Failed to insert task: {e}")))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, title = %task.title, "task inserted");
        self.get_task(id)
    }

    /// Fetch a task by id.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn get_task(&self, id: i64) -> Result<Task, SmartdoError> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                task_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    SmartdoError::NotFound(format!("task {id}"))
                },
                other => SmartdoError::Database(format!("Failed to load task {id}: {other}")),
            })
    }

    /// List tasks, soonest due first, undated tasks last.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tasks(&self, status: Option<Status>) -> Result<Vec<Task>, SmartdoError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY due_ts IS NULL, due_ts, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![status.map(|s| s.as_str())], task_from_row)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| SmartdoError::Database(format!("Failed to list tasks: {e}")))
    }

    /// Change a task's status.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn set_status(&self, id: i64, status: Status) -> Result<Task, SmartdoError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), id],
        )?;

        if changed == 0 {
            return Err(SmartdoError::NotFound(format!("task {id}")));
        }
        self.get_task(id)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn delete_task(&self, id: i64) -> Result<(), SmartdoError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(SmartdoError::NotFound(format!("task {id}")));
        }
        Ok(())
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let due_at: Option<String> = row.get(3)?;
    let priority: String = row.get(4)?;
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_at: due_at
            .as_deref()
            .map(|s| parse_timestamp(3, s))
            .transpose()?,
        priority: parse_text(4, &priority)?,
        status: parse_text(5, &status)?,
        created_at: parse_timestamp(6, &created_at)?.with_timezone(&Utc),
        updated_at: parse_timestamp(7, &updated_at)?.with_timezone(&Utc),
    })
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_text<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::nlp::Priority;

    fn due(s: &str) -> Option<DateTime<FixedOffset>> {
        Some(DateTime::parse_from_rfc3339(s).unwrap())
    }

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(migrations::get_version(&db.conn).unwrap() > 0);
    }

    #[test]
    fn test_open_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db = Database::open_at(&db_path).unwrap();
        assert!(migrations::get_version(&db.conn).unwrap() > 0);
        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_database_keeps_tasks() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let id = {
            let db = Database::open_at(&db_path).unwrap();
            db.insert_task(&NewTask::new("persist me", Priority::Low))
                .unwrap()
                .id
        };

        let db = Database::open_at(&db_path).unwrap();
        assert_eq!(db.get_task(id).unwrap().title, "persist me");
    }

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();
        let new = NewTask::new("Submit report", Priority::High)
            .with_description(Some("Q4 numbers".to_string()))
            .with_due(due("2025-01-02T17:00:00+01:00"));

        let task = db.insert_task(&new).unwrap();

        assert_eq!(task.title, "Submit report");
        assert_eq!(task.description.as_deref(), Some("Q4 numbers"));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.due_at, due("2025-01-02T17:00:00+01:00"));
        assert_eq!(task.due_at.unwrap().offset().local_minus_utc(), 3600);
        assert_eq!(task.created_at, task.updated_at);

        assert_eq!(db.get_task(task.id).unwrap(), task);
    }

    #[test]
    fn test_get_missing_task() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_task(42), Err(SmartdoError::NotFound(_))));
    }

    #[test]
    fn test_list_orders_by_due_then_undated() {
        let db = Database::open_in_memory().unwrap();
        db.insert_task(&NewTask::new("undated", Priority::Medium))
            .unwrap();
        // 10:00 in Berlin is earlier than 10:00 UTC.
        db.insert_task(
            &NewTask::new("later", Priority::Medium).with_due(due("2025-01-02T10:00:00+00:00")),
        )
        .unwrap();
        db.insert_task(
            &NewTask::new("sooner", Priority::Medium).with_due(due("2025-01-02T10:00:00+01:00")),
        )
        .unwrap();

        let titles: Vec<String> = db
            .list_tasks(None)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["sooner", "later", "undated"]);
    }

    #[test]
    fn test_list_filters_by_status() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_task(&NewTask::new("a", Priority::Medium)).unwrap();
        db.insert_task(&NewTask::new("b", Priority::Medium)).unwrap();
        db.set_status(a.id, Status::Completed).unwrap();

        let done = db.list_tasks(Some(Status::Completed)).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "a");

        let pending = db.list_tasks(Some(Status::Pending)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "b");

        assert_eq!(db.list_tasks(None).unwrap().len(), 2);
    }

    #[test]
    fn test_set_status() {
        let db = Database::open_in_memory().unwrap();
        let task = db.insert_task(&NewTask::new("a", Priority::Medium)).unwrap();

        let done = db.set_status(task.id, Status::Completed).unwrap();
        assert!(done.is_completed());
        assert!(done.updated_at >= task.updated_at);

        let reopened = db.set_status(task.id, Status::Pending).unwrap();
        assert!(!reopened.is_completed());

        assert!(matches!(
            db.set_status(999, Status::Completed),
            Err(SmartdoError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_task() {
        let db = Database::open_in_memory().unwrap();
        let task = db.insert_task(&NewTask::new("a", Priority::Medium)).unwrap();

        db.delete_task(task.id).unwrap();
        assert!(matches!(db.get_task(task.id), Err(SmartdoError::NotFound(_))));
        assert!(matches!(db.delete_task(task.id), Err(SmartdoError::NotFound(_))));
    }
}
