//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define the task record shared by repository, storage and CLI layers.
//! - Keep input validation next to the data it guards.
//!
//! # Invariants
//! - Every task is identified by a positive `TaskId` unique in its collection.
//! - Descriptions are non-empty once trimmed.

pub mod task;
