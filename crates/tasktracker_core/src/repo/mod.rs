//! Task repository: lifecycle operations over the in-memory collection.
//!
//! # Responsibility
//! - Own every task record for the lifetime of one process.
//! - Validate input, mutate, then flush the full collection to storage.
//!
//! # Invariants
//! - Writes validate before touching the collection.
//! - Every successful mutation is followed by a full-collection save.
//! - APIs return semantic errors (`Validation`, `NotFound`) alongside
//!   storage errors (`Decode`, `Write`).

pub mod task_repo;
