//! Core of the task tracker: task model, JSON persistence and the repository
//! that owns the task collection.
//! This crate is the single source of truth for task invariants.

pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use events::{EventKind, EventSink, LogEventSink, NoopEventSink};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{validate_description, Task, TaskId, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, TaskRepository};
pub use store::{DecodeReason, JsonFileStore, Loaded, StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
