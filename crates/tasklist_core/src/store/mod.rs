//! Store abstraction shared by the preference and relational backends.
//!
//! # Responsibility
//! - Define the identity-addressed `TaskStore` seam the controller drives.
//! - Select a backend from `TaskListConfig`.
//!
//! # Invariants
//! - After a successful mutation the backing storage reflects it.
//! - A failed mutation leaves the store's own view unchanged.

use crate::config::{StoreBackend, TaskListConfig};
use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::task_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod prefs;
pub mod sqlite;

pub use prefs::{PreferenceFile, PreferenceTaskStore};
pub use sqlite::SqliteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    /// The description is already stored; a set-backed store would collapse it.
    DuplicateDescription,
    Repo(RepoError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Preference file exists but does not hold the expected shape.
    Format {
        path: PathBuf,
        message: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateDescription => write!(f, "task already exists"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Format { path, message } => {
                write!(f, "malformed preference file `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::DuplicateDescription | Self::Format { .. } => None,
        }
    }
}

impl StoreError {
    /// Stable machine-readable code used in log lines and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateDescription => "duplicate",
            Self::Repo(_) => "db_error",
            Self::Io { .. } => "io_error",
            Self::Format { .. } => "format_error",
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// Identity-addressed persistence contract for the task list.
pub trait TaskStore {
    fn backend(&self) -> StoreBackend;
    /// Reads every stored task. Only the relational backend guarantees order.
    fn load(&mut self) -> StoreResult<Vec<Task>>;
    /// Persists a new task and returns its id. `description` must be normalized.
    fn add(&mut self, description: &str) -> StoreResult<TaskId>;
    /// Returns `true` iff a task with `id` existed and was modified.
    fn update(&mut self, id: TaskId, description: &str) -> StoreResult<bool>;
    /// Removes the task if present; no-op otherwise.
    fn delete(&mut self, id: TaskId) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for Box<S> {
    fn backend(&self) -> StoreBackend {
        (**self).backend()
    }

    fn load(&mut self) -> StoreResult<Vec<Task>> {
        (**self).load()
    }

    fn add(&mut self, description: &str) -> StoreResult<TaskId> {
        (**self).add(description)
    }

    fn update(&mut self, id: TaskId, description: &str) -> StoreResult<bool> {
        (**self).update(id, description)
    }

    fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id)
    }
}

/// Opens the backend named by `config.backend`.
pub fn open_store(config: &TaskListConfig) -> StoreResult<Box<dyn TaskStore + Send>> {
    match config.backend {
        StoreBackend::Sqlite => {
            std::fs::create_dir_all(&config.data_dir).map_err(|source| StoreError::Io {
                path: config.data_dir.clone(),
                source,
            })?;
            let store = SqliteTaskStore::open(config.db_path(), config.upgrade_policy)?;
            Ok(Box::new(store))
        }
        StoreBackend::Preferences => {
            let file = PreferenceFile::new(config.prefs_path(), config.prefs_key.clone());
            Ok(Box::new(PreferenceTaskStore::new(file)))
        }
    }
}
