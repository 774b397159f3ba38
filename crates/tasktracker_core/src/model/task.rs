//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its on-disk field names.
//! - Provide validation helpers used on every write path.
//!
//! # Invariants
//! - `id` is positive, below `TaskId::MAX`, and never reused for another task.
//! - `description` is stored trimmed and is never empty.
//! - `notes` is absent unless explicitly set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier assigned by the repository, never by callers.
pub type TaskId = u64;

/// A single to-do record.
///
/// Field names are part of the storage format and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub completed: bool,
    /// Omitted from the stored record when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    /// Creates an open task without notes.
    ///
    /// Does not validate; callers go through [`validate_description`] first.
    pub fn new(id: TaskId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            notes: None,
        }
    }

}

/// Validation failures for task input and persisted task collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyDescription,
    InvalidId(TaskId),
    DuplicateId(TaskId),
    IdSpaceExhausted,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description cannot be empty"),
            Self::InvalidId(id) => {
                write!(f, "task id must be between 1 and {}, got {id}", TaskId::MAX - 1)
            }
            Self::DuplicateId(id) => write!(f, "task id {id} appears more than once"),
            Self::IdSpaceExhausted => write!(f, "no task ids left to assign"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims `raw` and rejects blank descriptions.
///
/// Returns the trimmed text that should be stored.
pub fn validate_description(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Checks collection-level id invariants: in `1..TaskId::MAX` and unique.
///
/// `TaskId::MAX` is reserved so `max + 1` never overflows.
pub fn validate_ids(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.id == 0 || task.id == TaskId::MAX {
            return Err(TaskValidationError::InvalidId(task.id));
        }
        if !seen.insert(task.id) {
            return Err(TaskValidationError::DuplicateId(task.id));
        }
    }
    Ok(())
}

/// Next id for a collection: one past the highest id, or `1` when empty.
///
/// Gaps left by deletion are never filled. Saturates at `TaskId::MAX`,
/// which is never a valid id and means the id space is used up.
pub fn next_id<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> TaskId {
    tasks
        .into_iter()
        .map(|task| task.id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
