//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/list/update/delete over the single `tasks` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `list()` returns rows in insertion (id) order.
//! - `update()` reports `false` rather than erroring for a missing row.
//! - `delete()` is a no-op for a missing row.

use crate::db::DbError;
use crate::model::task::{normalize_description, Task, TaskId, TaskValidationError};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT id, description FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for relational task CRUD.
pub trait TaskRepository {
    /// Inserts a row and returns its generated id.
    fn add(&self, description: &str) -> RepoResult<TaskId>;
    /// Full scan in insertion order. No filtering, no paging.
    fn list(&self) -> RepoResult<Vec<Task>>;
    fn get(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Returns `true` iff a row with `id` existed and was modified.
    fn update(&self, id: TaskId, description: &str) -> RepoResult<bool>;
    fn delete(&self, id: TaskId) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn add(&self, description: &str) -> RepoResult<TaskId> {
        let description = normalize_description(description)?;

        self.conn.execute(
            "INSERT INTO tasks (description) VALUES (?1);",
            params![description],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=task_add module=repo status=ok task_id={id}");
        Ok(id)
    }

    fn list(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn get(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn update(&self, id: TaskId, description: &str) -> RepoResult<bool> {
        let description = normalize_description(description)?;

        let changed = self.conn.execute(
            "UPDATE tasks SET description = ?1 WHERE id = ?2;",
            params![description, id],
        )?;

        debug!("event=task_update module=repo status=ok task_id={id} changed={changed}");
        Ok(changed > 0)
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", params![id])?;

        debug!("event=task_delete module=repo status=ok task_id={id} changed={changed}");
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;
    let description = row
        .get::<_, Option<String>>("description")?
        .ok_or_else(|| {
            RepoError::InvalidData(format!("NULL description in tasks.description (id={id})"))
        })?;

    let task = Task { id, description };
    task.validate().map_err(|err| {
        RepoError::InvalidData(format!("{err} in tasks.description (id={id})"))
    })?;
    Ok(task)
}
