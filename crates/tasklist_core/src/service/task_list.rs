//! Task list controller.
//!
//! # Responsibility
//! - Load the list once, apply add/edit/delete to both store and memory.
//! - Report what changed so a renderer can refresh incrementally.
//! - Dispatch row events synchronously, one at a time.
//!
//! # Invariants
//! - After every `Ok` return the in-memory list equals the store contents.
//! - Any `Err` return leaves the in-memory list untouched.
//! - Validation happens before any store call.

use crate::adapter::{RowEvent, RowGesture, TaskAdapter};
use crate::model::task::{normalize_description, Task, TaskId, TaskValidationError};
use crate::store::{StoreError, TaskStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug)]
pub enum ControllerError {
    /// Blank input; surfaced inline, nothing was changed.
    Validation(TaskValidationError),
    /// No task with this id in the current list.
    NotFound(TaskId),
    Store(StoreError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl ControllerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Store(err) => err.code(),
        }
    }
}

impl From<TaskValidationError> for ControllerError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// What a renderer must refresh after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Unchanged,
    Inserted(usize),
    Changed(usize),
    Removed(usize),
    /// The whole list was replaced.
    Reset,
}

/// Yes/no confirmation for destructive actions.
pub trait Confirm {
    fn confirm_delete(&mut self, task: &Task) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Task) -> bool,
{
    fn confirm_delete(&mut self, task: &Task) -> bool {
        self(task)
    }
}

/// Interactive input needed while dispatching row events.
pub trait Prompt: Confirm {
    /// Asks for replacement text; `None` means the user cancelled.
    fn edit_text(&mut self, task: &Task) -> Option<String>;
}

/// Mediates between a [`TaskStore`] and a rendering surface.
pub struct TaskListController<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: TaskStore> TaskListController<S> {
    /// Loads the current list from `store`.
    pub fn open(mut store: S) -> ControllerResult<Self> {
        let tasks = store.load()?;
        info!(
            "event=list_open module=controller status=ok backend={} count={}",
            store.backend().as_str(),
            tasks.len()
        );
        Ok(Self { store, tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn adapter(&self) -> TaskAdapter<'_> {
        TaskAdapter::new(&self.tasks)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Adds a task from raw user input and appends it to the list.
    ///
    /// # Errors
    /// - `Validation` when `text` is blank after trimming.
    /// - `Store` when persistence fails (including duplicate rejection in the
    ///   preference backend).
    pub fn add_task(&mut self, text: &str) -> ControllerResult<ListChange> {
        let description = self.validated("task_add", text)?;
        let id = self
            .store
            .add(&description)
            .map_err(|err| self.store_failure("task_add", None, err))?;

        self.tasks.push(Task::new(id, description));
        let index = self.tasks.len() - 1;
        info!(
            "event=task_add module=controller status=ok task_id={id} count={}",
            self.tasks.len()
        );
        Ok(ListChange::Inserted(index))
    }

    /// Replaces the description of task `id`.
    ///
    /// # Errors
    /// - `Validation` when `new_text` is blank; the stored value is untouched.
    /// - `NotFound` when `id` is not in the list or the store has no such row.
    pub fn edit_task(&mut self, id: TaskId, new_text: &str) -> ControllerResult<ListChange> {
        let description = self.validated("task_edit", new_text)?;
        let index = self.index_of(id)?;

        let updated = self
            .store
            .update(id, &description)
            .map_err(|err| self.store_failure("task_edit", Some(id), err))?;
        if !updated {
            warn!("event=task_edit module=controller status=error task_id={id} error_code=not_found");
            return Err(ControllerError::NotFound(id));
        }

        self.tasks[index].description = description;
        info!("event=task_edit module=controller status=ok task_id={id}");
        Ok(ListChange::Changed(index))
    }

    /// Deletes task `id` once `confirm` agrees; declining is a no-op.
    pub fn delete_task<C>(&mut self, id: TaskId, confirm: &mut C) -> ControllerResult<ListChange>
    where
        C: Confirm + ?Sized,
    {
        let index = self.index_of(id)?;
        if !confirm.confirm_delete(&self.tasks[index]) {
            info!("event=task_delete module=controller status=cancelled task_id={id}");
            return Ok(ListChange::Unchanged);
        }

        self.store
            .delete(id)
            .map_err(|err| self.store_failure("task_delete", Some(id), err))?;

        self.tasks.remove(index);
        info!(
            "event=task_delete module=controller status=ok task_id={id} count={}",
            self.tasks.len()
        );
        Ok(ListChange::Removed(index))
    }

    /// Completion hook for the row's done marker.
    ///
    /// Has no persisted effect; completion state is not modelled.
    pub fn mark_done(&mut self, id: TaskId) -> ControllerResult<ListChange> {
        self.index_of(id)?;
        info!("event=task_done module=controller status=ignored task_id={id}");
        Ok(ListChange::Unchanged)
    }

    /// Re-reads the store, discarding the in-memory list.
    ///
    /// Recovery path after a storage failure left memory and store apart.
    pub fn reload(&mut self) -> ControllerResult<ListChange> {
        self.tasks = self.store.load()?;
        info!(
            "event=list_reload module=controller status=ok count={}",
            self.tasks.len()
        );
        Ok(ListChange::Reset)
    }

    /// Handles one row event to completion before returning.
    pub fn dispatch<P>(&mut self, event: RowEvent, prompt: &mut P) -> ControllerResult<ListChange>
    where
        P: Prompt + ?Sized,
    {
        match event.gesture {
            RowGesture::Done => self.mark_done(event.task_id),
            RowGesture::Delete => self.delete_task(event.task_id, prompt),
            RowGesture::Edit => {
                let index = self.index_of(event.task_id)?;
                match prompt.edit_text(&self.tasks[index]) {
                    Some(text) => self.edit_task(event.task_id, &text),
                    None => Ok(ListChange::Unchanged),
                }
            }
        }
    }

    fn index_of(&self, id: TaskId) -> ControllerResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(ControllerError::NotFound(id))
    }

    fn validated(&self, event: &str, text: &str) -> ControllerResult<String> {
        normalize_description(text).map_err(|err| {
            info!("event={event} module=controller status=rejected error_code=validation");
            ControllerError::Validation(err)
        })
    }

    fn store_failure(&self, event: &str, id: Option<TaskId>, err: StoreError) -> ControllerError {
        let err = ControllerError::from(err);
        warn!(
            "event={event} module=controller status=error task_id={} error_code={}",
            id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            err.code()
        );
        err
    }
}
