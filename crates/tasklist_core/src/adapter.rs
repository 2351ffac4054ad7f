//! Read-only binding from the in-memory task list to rendered rows.
//!
//! # Responsibility
//! - Expose row count and per-row display data to a rendering surface.
//! - Turn a row gesture into an event addressed by stable task id.
//!
//! # Invariants
//! - Binding never mutates list state.
//! - Gesture events carry the task id captured at gesture time, so a queued
//!   event can never land on a different task after a structural edit.

use crate::model::task::{Task, TaskId};

/// Display data for one bound row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRow<'a> {
    pub position: usize,
    pub task_id: TaskId,
    pub text: &'a str,
}

/// User gesture on a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowGesture {
    /// Tap on the completion marker.
    Done,
    Edit,
    Delete,
}

impl RowGesture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

/// A gesture resolved against a task identity, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEvent {
    pub gesture: RowGesture,
    pub task_id: TaskId,
}

/// Borrowed view over the controller's list.
#[derive(Debug, Clone, Copy)]
pub struct TaskAdapter<'a> {
    tasks: &'a [Task],
}

impl<'a> TaskAdapter<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    pub fn item_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns display data for the row at `index`, or `None` past the end.
    pub fn bind(&self, index: usize) -> Option<TaskRow<'a>> {
        self.tasks.get(index).map(|task| TaskRow {
            position: index,
            task_id: task.id,
            text: task.description.as_str(),
        })
    }

    /// Iterates every row in display order.
    pub fn rows(&self) -> impl Iterator<Item = TaskRow<'a>> + 'a {
        let tasks = self.tasks;
        tasks.iter().enumerate().map(|(position, task)| TaskRow {
            position,
            task_id: task.id,
            text: task.description.as_str(),
        })
    }

    /// Resolves a gesture on the row currently at `index`.
    pub fn gesture(&self, index: usize, gesture: RowGesture) -> Option<RowEvent> {
        self.tasks.get(index).map(|task| RowEvent {
            gesture,
            task_id: task.id,
        })
    }

    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{RowEvent, RowGesture, TaskAdapter};
    use crate::model::task::Task;

    fn sample() -> Vec<Task> {
        vec![Task::new(1, "Buy milk"), Task::new(7, "Walk dog")]
    }

    #[test]
    fn bind_exposes_row_data_and_stops_at_end() {
        let tasks = sample();
        let adapter = TaskAdapter::new(&tasks);

        assert_eq!(adapter.item_count(), 2);
        let row = adapter.bind(1).expect("second row");
        assert_eq!(row.position, 1);
        assert_eq!(row.task_id, 7);
        assert_eq!(row.text, "Walk dog");
        assert!(adapter.bind(2).is_none());
    }

    #[test]
    fn gesture_captures_task_identity_not_position() {
        let mut tasks = sample();
        let event = TaskAdapter::new(&tasks)
            .gesture(1, RowGesture::Delete)
            .expect("row exists");

        tasks.remove(0);
        let adapter = TaskAdapter::new(&tasks);
        assert_eq!(
            event,
            RowEvent {
                gesture: RowGesture::Delete,
                task_id: 7
            }
        );
        assert_eq!(adapter.position_of(event.task_id), Some(0));
    }

    #[test]
    fn rows_iterates_in_display_order() {
        let tasks = sample();
        let texts: Vec<&str> = TaskAdapter::new(&tasks).rows().map(|row| row.text).collect();
        assert_eq!(texts, vec!["Buy milk", "Walk dog"]);
    }
}
