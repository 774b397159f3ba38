//! Persistence layer for the task collection.
//!
//! # Responsibility
//! - Load and save the whole task collection as one unit.
//! - Stay ignorant of task lifecycle rules beyond the record shape.
//!
//! # Invariants
//! - A missing storage location is a normal first run, not an error.
//! - An undecodable storage location yields an empty collection plus a
//!   warning, and is left untouched on disk by load.
//! - Its content is never overwritten: callers set it aside before saving.
//! - A save either replaces the previous content completely or leaves it as-is.

use crate::model::task::{Task, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;

pub use json_file::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Storage exists but could not be read or parsed into a task collection.
    Decode { path: PathBuf, reason: DecodeReason },
    /// Collection could not be serialized.
    Encode(serde_json::Error),
    /// Serialized collection could not be written to storage.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Underlying cause of a [`StoreError::Decode`].
#[derive(Debug)]
pub enum DecodeReason {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(TaskValidationError),
}

impl Display for DecodeReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { path, reason } => {
                write!(f, "could not decode tasks from `{}`: {reason}", path.display())
            }
            Self::Encode(err) => write!(f, "could not encode tasks: {err}"),
            Self::Write { path, source } => {
                write!(f, "could not save tasks to `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode { reason, .. } => match reason {
                DecodeReason::Io(err) => Some(err),
                DecodeReason::Json(err) => Some(err),
                DecodeReason::Invalid(err) => Some(err),
            },
            Self::Encode(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Result of loading a collection.
///
/// `tasks` is always usable; `warning` carries a decode failure that forced
/// the empty fallback.
#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: Vec<Task>,
    pub warning: Option<StoreError>,
}

impl Loaded {
    pub fn ok(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            warning: None,
        }
    }

    pub fn degraded(warning: StoreError) -> Self {
        Self {
            tasks: Vec::new(),
            warning: Some(warning),
        }
    }
}

/// Whole-collection storage contract.
pub trait TaskStore {
    fn load(&self) -> Loaded;
    fn save(&self, tasks: &[Task]) -> StoreResult<()>;

    /// Moves undecodable content out of the way so a later save cannot
    /// overwrite it. Returns where it went, or `None` when nothing was moved.
    fn set_aside_unreadable(&self) -> StoreResult<Option<PathBuf>> {
        Ok(None)
    }
}
