//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list controller to Dart via FRB.
//! - Translate controller results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One controller session per process; ids returned by `task_list` stay
//!   valid for later calls in the same process.
//! - Calls are serialized through the session lock, so each handler finishes
//!   before the next one starts.

use log::{error, warn};
use std::sync::{Mutex, OnceLock, PoisonError};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_store,
    ping as ping_inner, ControllerError, ControllerResult, ListChange, StoreBackend, Task,
    TaskListConfig, TaskListController, TaskStore,
};

type SessionController = TaskListController<Box<dyn TaskStore + Send>>;

static TASK_SESSION: OnceLock<Mutex<Option<SessionController>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One row of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Stable id to pass back to edit/delete/done calls.
    pub id: i64,
    pub description: String,
}

/// Full list response used at screen start and after `reset` changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Result of one mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Id of the task the call created or touched.
    pub task_id: Option<i64>,
    /// Refresh hint: `inserted|changed|removed|unchanged|reset`.
    pub change: String,
    /// Row position for `inserted|changed|removed`.
    pub index: Option<u32>,
    /// Stable failure code, e.g. `validation`, `not_found`, `duplicate`.
    pub error_code: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<i64>, change: ListChange) -> Self {
        let (change, index) = describe_change(change);
        Self {
            ok: true,
            task_id,
            change: change.to_string(),
            index,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: &SessionError) -> Self {
        Self {
            ok: false,
            task_id: None,
            change: "unchanged".to_string(),
            index: None,
            error_code: Some(err.code().to_string()),
            message: format!("{operation} failed: {err}"),
        }
    }
}

/// Opens (or reopens) the task session at `data_dir` with `backend`.
///
/// `backend` is `sqlite` or `prefs`; an empty string keeps the default.
///
/// # FFI contract
/// - Replaces any open session; ids handed out earlier become invalid.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn task_store_open(data_dir: String, backend: String) -> String {
    let data_dir = data_dir.trim();
    if data_dir.is_empty() {
        return "data_dir cannot be empty".to_string();
    }
    let mut config = TaskListConfig::with_data_dir(data_dir);
    if !backend.trim().is_empty() {
        match StoreBackend::parse(&backend) {
            Ok(parsed) => config.backend = parsed,
            Err(err) => return err.to_string(),
        }
    }

    match open_controller(&config) {
        Ok(controller) => {
            *lock_session() = Some(controller);
            String::new()
        }
        Err(err) => {
            error!(
                "event=ffi_store_open module=ffi status=error error_code={}",
                err.code()
            );
            format!("task_store_open failed: {err}")
        }
    }
}

/// Returns every task in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> TaskListResponse {
    match with_session(|controller| Ok(controller.tasks().iter().map(to_item).collect::<Vec<_>>()))
    {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_list failed: {err}"),
        },
    }
}

/// Adds a task from raw input; blank input fails with `validation`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> TaskActionResponse {
    let result = with_session(|controller| {
        let change = controller.add_task(&text)?;
        Ok((controller.tasks().last().map(|task| task.id), change))
    });
    match result {
        Ok((task_id, change)) => TaskActionResponse::success("Task added.", task_id, change),
        Err(err) => TaskActionResponse::failure("task_add", &err),
    }
}

/// Replaces the description of task `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit(id: i64, text: String) -> TaskActionResponse {
    match with_session(|controller| controller.edit_task(id, &text)) {
        Ok(change) => TaskActionResponse::success("Task updated.", Some(id), change),
        Err(err) => TaskActionResponse::failure("task_edit", &err),
    }
}

/// Deletes task `id` when the user confirmed the dialog.
///
/// `confirmed = false` is a successful no-op with change `unchanged`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64, confirmed: bool) -> TaskActionResponse {
    match with_session(|controller| controller.delete_task(id, &mut |_: &Task| confirmed)) {
        Ok(ListChange::Unchanged) => {
            TaskActionResponse::success("Delete cancelled.", Some(id), ListChange::Unchanged)
        }
        Ok(change) => TaskActionResponse::success("Task deleted.", Some(id), change),
        Err(err) => TaskActionResponse::failure("task_delete", &err),
    }
}

/// Done-marker tap; accepted but not persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn task_mark_done(id: i64) -> TaskActionResponse {
    match with_session(|controller| controller.mark_done(id)) {
        Ok(change) => TaskActionResponse::success("Noted.", Some(id), change),
        Err(err) => TaskActionResponse::failure("task_mark_done", &err),
    }
}

/// Re-reads the store; UI should redraw the whole list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_reload() -> TaskActionResponse {
    match with_session(|controller| controller.reload()) {
        Ok(change) => TaskActionResponse::success("Reloaded.", None, change),
        Err(err) => TaskActionResponse::failure("task_reload", &err),
    }
}

#[derive(Debug)]
enum SessionError {
    Config(String),
    Controller(ControllerError),
}

impl SessionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Controller(err) => err.code(),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "{message}"),
            Self::Controller(err) => write!(f, "{err}"),
        }
    }
}

impl From<ControllerError> for SessionError {
    fn from(value: ControllerError) -> Self {
        Self::Controller(value)
    }
}

fn lock_session() -> std::sync::MutexGuard<'static, Option<SessionController>> {
    TASK_SESSION
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(|poisoned| {
            warn!("event=ffi_session module=ffi status=recover reason=lock_poisoned");
            PoisonError::into_inner(poisoned)
        })
}

fn open_controller(config: &TaskListConfig) -> Result<SessionController, SessionError> {
    let store = open_store(config).map_err(|err| SessionError::Controller(err.into()))?;
    Ok(TaskListController::open(store)?)
}

fn with_session<T>(
    f: impl FnOnce(&mut SessionController) -> ControllerResult<T>,
) -> Result<T, SessionError> {
    let mut session = lock_session();
    if session.is_none() {
        let config = TaskListConfig::from_env().map_err(|err| SessionError::Config(err.to_string()))?;
        *session = Some(open_controller(&config)?);
    }

    match session.as_mut() {
        Some(controller) => Ok(f(controller)?),
        None => Err(SessionError::Config("task session unavailable".to_string())),
    }
}

fn to_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id,
        description: task.description.clone(),
    }
}

fn describe_change(change: ListChange) -> (&'static str, Option<u32>) {
    let index = |position: usize| u32::try_from(position).ok();
    match change {
        ListChange::Unchanged => ("unchanged", None),
        ListChange::Inserted(position) => ("inserted", index(position)),
        ListChange::Changed(position) => ("changed", index(position)),
        ListChange::Removed(position) => ("removed", index(position)),
        ListChange::Reset => ("reset", None),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, task_add, task_delete, task_edit, task_list,
        task_mark_done, task_store_open,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static SESSION_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    /// Points the shared session at a per-run temp dir before first use.
    fn use_temp_session() {
        SESSION_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().expect("session temp dir");
            let path = dir.path().to_str().expect("utf-8 temp path").to_string();
            let error = task_store_open(path, "sqlite".to_string());
            assert!(error.is_empty(), "{error}");
            dir
        });
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn task_store_open_rejects_bad_input_without_touching_session() {
        assert!(!task_store_open(String::new(), "sqlite".to_string()).is_empty());
        let error = task_store_open("/tmp/tasklist-ffi".to_string(), "redis".to_string());
        assert!(error.contains("unsupported backend"));
    }

    #[test]
    fn task_add_then_list_contains_trimmed_task() {
        use_temp_session();
        let token = unique_token("ffi-add");
        let added = task_add(format!("  {token}  "));
        assert!(added.ok, "{}", added.message);
        assert_eq!(added.change, "inserted");
        let id = added.task_id.expect("add should return task id");

        let listed = task_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed
            .items
            .iter()
            .any(|item| item.id == id && item.description == token));
    }

    #[test]
    fn task_add_rejects_blank_text() {
        use_temp_session();
        let response = task_add("   ".to_string());
        assert!(!response.ok);
        assert_eq!(response.error_code.as_deref(), Some("validation"));
    }

    #[test]
    fn temp_session_holds_only_this_runs_tasks() {
        use_temp_session();
        let dir = SESSION_DIR.get().expect("session dir initialized");
        assert!(dir.path().join("tasks.db").exists());
        assert!(task_list()
            .items
            .iter()
            .all(|item| item.description.starts_with("ffi-")));
    }

    #[test]
    fn task_edit_and_delete_use_stable_ids() {
        use_temp_session();
        let token = unique_token("ffi-edit");
        let id = task_add(token.clone()).task_id.expect("task id");

        let edited = task_edit(id, format!("{token}-v2"));
        assert!(edited.ok, "{}", edited.message);
        assert_eq!(edited.change, "changed");

        let blank = task_edit(id, " ".to_string());
        assert_eq!(blank.error_code.as_deref(), Some("validation"));

        let cancelled = task_delete(id, false);
        assert!(cancelled.ok);
        assert_eq!(cancelled.change, "unchanged");
        assert!(task_list().items.iter().any(|item| item.id == id));

        let deleted = task_delete(id, true);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.change, "removed");
        assert!(!task_list().items.iter().any(|item| item.id == id));

        let missing = task_mark_done(id);
        assert_eq!(missing.error_code.as_deref(), Some("not_found"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
