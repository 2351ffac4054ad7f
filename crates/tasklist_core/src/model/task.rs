//! Task record and description validation.
//!
//! # Responsibility
//! - Define the canonical `(id, description)` task shape.
//! - Normalize user input into a storable description.
//!
//! # Invariants
//! - `description` is trimmed and non-empty for every valid task.
//! - `id` is assigned by the store, never by callers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier.
///
/// Relational stores hand out monotonic row ids. The preference store hands out
/// session-local handles that are not persisted.
pub type TaskId = i64;

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Input was empty or whitespace-only after trimming.
    EmptyDescription,
    /// Stored description carries leading/trailing whitespace.
    UntrimmedDescription,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description cannot be empty"),
            Self::UntrimmedDescription => {
                write!(f, "task description must not have surrounding whitespace")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    pub fn new(id: TaskId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// Checks the description invariant.
    ///
    /// # Errors
    /// - `EmptyDescription` when the description is blank.
    /// - `UntrimmedDescription` when it was stored without trimming.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_description(&self.description)
    }
}

/// Trims raw user input into a storable description.
///
/// # Errors
/// - `EmptyDescription` when nothing is left after trimming.
pub fn normalize_description(text: &str) -> Result<String, TaskValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_description(description: &str) -> Result<(), TaskValidationError> {
    if description.trim().is_empty() {
        return Err(TaskValidationError::EmptyDescription);
    }
    if description.trim().len() != description.len() {
        return Err(TaskValidationError::UntrimmedDescription);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_description, Task, TaskValidationError};

    #[test]
    fn normalize_trims_surrounding_whitespace() {
        assert_eq!(
            normalize_description("  Buy milk \n").expect("non-empty input"),
            "Buy milk"
        );
    }

    #[test]
    fn normalize_rejects_blank_input() {
        assert_eq!(
            normalize_description(" \t\n"),
            Err(TaskValidationError::EmptyDescription)
        );
        assert_eq!(
            normalize_description(""),
            Err(TaskValidationError::EmptyDescription)
        );
    }

    #[test]
    fn validate_rejects_untrimmed_description() {
        let task = Task::new(1, " padded ");
        assert_eq!(
            task.validate(),
            Err(TaskValidationError::UntrimmedDescription)
        );
        assert!(Task::new(2, "Walk dog").validate().is_ok());
    }
}
