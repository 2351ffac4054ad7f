//! Core logic for the task list: storage backends, list controller, adapter.
//! This crate is the single source of truth for task invariants.

pub mod adapter;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use adapter::{RowEvent, RowGesture, TaskAdapter, TaskRow};
pub use config::{ConfigError, StoreBackend, TaskListConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{normalize_description, Task, TaskId, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_list::{
    Confirm, ControllerError, ControllerResult, ListChange, Prompt, TaskListController,
};
pub use store::{
    open_store, PreferenceFile, PreferenceTaskStore, SqliteTaskStore, StoreError, StoreResult,
    TaskStore,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
