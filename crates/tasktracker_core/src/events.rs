//! Semantic event emission for repository mutations and failures.
//!
//! # Responsibility
//! - Give the repository one narrow "emit event" dependency.
//! - Keep log format, level filtering and destination out of task logic.
//!
//! # Invariants
//! - Exactly one event per successful mutation and one per failed operation.

use crate::logging::single_line;
use log::{error, info, warn};
use std::fmt::{Display, Formatter};

const MAX_EVENT_MESSAGE_CHARS: usize = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TaskCreated,
    TaskCompleted,
    TaskUpdated,
    TaskDeleted,
    TaskNotesUpdated,
    /// Validation or lookup failure on a repository call.
    OperationFailed,
    StoreDecodeFailed,
    StoreWriteFailed,
}

impl EventKind {
    /// Stable `event=` token used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskCompleted => "task_completed",
            Self::TaskUpdated => "task_updated",
            Self::TaskDeleted => "task_deleted",
            Self::TaskNotesUpdated => "task_notes_updated",
            Self::OperationFailed => "operation_failed",
            Self::StoreDecodeFailed => "store_decode_failed",
            Self::StoreWriteFailed => "store_write_failed",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Self::OperationFailed | Self::StoreDecodeFailed | Self::StoreWriteFailed
        )
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for repository events.
pub trait EventSink {
    fn emit(&self, kind: EventKind, message: &str);
}

/// Forwards events to the `log` facade.
///
/// Whatever backend the process installed decides format and destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, kind: EventKind, message: &str) {
        let message = single_line(message, MAX_EVENT_MESSAGE_CHARS);
        let status = if kind.is_failure() { "error" } else { "ok" };
        match kind {
            EventKind::StoreWriteFailed => {
                error!("event={kind} module=repo status={status} message={message}")
            }
            EventKind::OperationFailed | EventKind::StoreDecodeFailed => {
                warn!("event={kind} module=repo status={status} message={message}")
            }
            _ => info!("event={kind} module=repo status={status} message={message}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _kind: EventKind, _message: &str) {}
}
