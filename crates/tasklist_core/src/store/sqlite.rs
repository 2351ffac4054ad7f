//! Relational `TaskStore` backed by an owned SQLite connection.

use super::{StoreResult, TaskStore};
use crate::config::StoreBackend;
use crate::db::{open_db_in_memory, open_db_with_policy, UpgradePolicy};
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use rusqlite::Connection;
use std::path::Path;

/// Owns a migrated connection and delegates to [`SqliteTaskRepository`].
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    pub fn open(path: impl AsRef<Path>, policy: UpgradePolicy) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_with_policy(path, policy)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a connection that already went through `open_db*`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn repo(&self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository::new(&self.conn)
    }
}

impl TaskStore for SqliteTaskStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Sqlite
    }

    fn load(&mut self) -> StoreResult<Vec<Task>> {
        Ok(self.repo().list()?)
    }

    fn add(&mut self, description: &str) -> StoreResult<TaskId> {
        Ok(self.repo().add(description)?)
    }

    fn update(&mut self, id: TaskId, description: &str) -> StoreResult<bool> {
        Ok(self.repo().update(id, description)?)
    }

    fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        Ok(self.repo().delete(id)?)
    }
}
