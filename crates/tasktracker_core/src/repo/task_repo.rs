//! In-memory task repository with id index and write-through persistence.
//!
//! # Responsibility
//! - Provide add/list/complete/update/delete plus notes and lookup helpers.
//! - Emit one semantic event per mutation or failure.
//!
//! # Invariants
//! - `index` maps every live task id to its slot in `slots`, and nothing else.
//! - Slot order is insertion order; deletion leaves a hole instead of
//!   shifting, so lookups stay O(1) and storage order is preserved.
//! - Ids are handed out from a high-water mark and never reused while the
//!   process runs.
//! - After a failed load, storage content is set aside before the first save
//!   so it is never overwritten.

use crate::events::{EventKind, EventSink, LogEventSink};
use crate::model::task::{next_id, validate_description, Task, TaskId, TaskValidationError};
use crate::store::{StoreError, TaskStore};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Closed set of failures surfaced by repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input failed a precondition.
    Validation(TaskValidationError),
    /// No live task has this id.
    NotFound(TaskId),
    /// Storage existed but could not be decoded; the collection started empty.
    Decode(StoreError),
    /// The change is applied in memory but was not saved.
    Write(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task with id {id} not found"),
            Self::Decode(err) => write!(
                f,
                "{err}; starting with an empty task list (the file is kept as a `.corrupt-N` copy on the next save)"
            ),
            Self::Write(err) => write!(f, "change not saved: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Decode(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Owner of the task collection for one process.
///
/// Not meant for concurrent use; one caller drives it at a time.
pub struct TaskRepository<S, E = LogEventSink> {
    store: S,
    events: E,
    slots: Vec<Option<Task>>,
    index: HashMap<TaskId, usize>,
    next_id: TaskId,
    load_warning: Option<RepoError>,
    unreadable_on_disk: bool,
}

impl<S: TaskStore, E: EventSink> TaskRepository<S, E> {
    /// Loads the collection from `store` and builds the id index.
    ///
    /// Never fails: an undecodable store yields an empty repository, a
    /// `StoreDecodeFailed` event, and a warning available through
    /// [`Self::take_load_warning`].
    pub fn open(store: S, events: E) -> Self {
        let mut repo = Self {
            store,
            events,
            slots: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            load_warning: None,
            unreadable_on_disk: false,
        };
        if let Err(err) = repo.reload() {
            repo.load_warning = Some(err);
        }
        repo
    }

    /// Replaces the working set with what storage currently holds.
    ///
    /// # Errors
    /// - `Decode` when storage cannot be decoded; the working set is then empty
    ///   and the unreadable content is set aside on the next save.
    pub fn reload(&mut self) -> RepoResult<()> {
        let loaded = self.store.load();
        self.replace_all(loaded.tasks);
        self.unreadable_on_disk = loaded.warning.is_some();
        match loaded.warning {
            Some(warning) => Err(self.fail("load", RepoError::Decode(warning))),
            None => Ok(()),
        }
    }

    /// Returns the decode warning raised while opening, once.
    pub fn take_load_warning(&mut self) -> Option<RepoError> {
        self.load_warning.take()
    }

    /// Creates a task from `description` and persists the collection.
    ///
    /// # Errors
    /// - `Validation` when the trimmed description is empty, or when the
    ///   highest assignable id is already taken.
    /// - `Write` when the save fails; the task stays in memory.
    pub fn add(&mut self, description: &str) -> RepoResult<Task> {
        let description =
            validate_description(description).map_err(|err| self.fail("add", err.into()))?;
        if self.next_id == TaskId::MAX {
            return Err(self.fail("add", TaskValidationError::IdSpaceExhausted.into()));
        }

        let task = Task::new(self.next_id, description);
        self.next_id += 1;
        self.index.insert(task.id, self.slots.len());
        self.slots.push(Some(task.clone()));

        self.persist("add")?;
        self.events.emit(
            EventKind::TaskCreated,
            &format!("id={} description={:?}", task.id, task.description),
        );
        Ok(task)
    }

    /// All tasks ordered by ascending id.
    pub fn list(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.iter().collect();
        tasks.sort_by_key(|task| task.id);
        tasks
    }

    /// Tasks in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.slots.iter().flatten()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index
            .get(&id)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Marks a task completed.
    ///
    /// Returns `false` without saving when the task was already completed.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - `Write` when the save fails.
    pub fn complete(&mut self, id: TaskId) -> RepoResult<bool> {
        let task = self.find_mut("complete", id)?;
        if task.completed {
            return Ok(false);
        }
        task.completed = true;

        self.persist("complete")?;
        self.events.emit(EventKind::TaskCompleted, &format!("id={id}"));
        Ok(true)
    }

    /// Replaces a task description.
    ///
    /// # Errors
    /// - `Validation` when the trimmed description is empty (checked first).
    /// - `NotFound` for an unknown id.
    /// - `Write` when the save fails.
    pub fn update(&mut self, id: TaskId, new_description: &str) -> RepoResult<()> {
        let description =
            validate_description(new_description).map_err(|err| self.fail("update", err.into()))?;

        let task = self.find_mut("update", id)?;
        task.description = description;
        let message = format!("id={id} description={:?}", task.description);

        self.persist("update")?;
        self.events.emit(EventKind::TaskUpdated, &message);
        Ok(())
    }

    /// Sets or clears the notes of a task.
    ///
    /// `None` or blank text clears the notes; other text is stored trimmed.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - `Write` when the save fails.
    pub fn set_notes(&mut self, id: TaskId, notes: Option<&str>) -> RepoResult<()> {
        let notes = notes
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let task = self.find_mut("set_notes", id)?;
        let cleared = notes.is_none();
        task.notes = notes;

        self.persist("set_notes")?;
        self.events.emit(
            EventKind::TaskNotesUpdated,
            &format!("id={id} cleared={cleared}"),
        );
        Ok(())
    }

    /// Removes exactly the task with `id` and returns it.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - `Write` when the save fails; the task stays removed in memory.
    pub fn delete(&mut self, id: TaskId) -> RepoResult<Task> {
        let Some(slot) = self.index.remove(&id) else {
            return Err(self.fail("delete", RepoError::NotFound(id)));
        };
        let Some(task) = self.slots[slot].take() else {
            return Err(self.fail("delete", RepoError::NotFound(id)));
        };
        self.compact_if_sparse();

        self.persist("delete")?;
        self.events.emit(EventKind::TaskDeleted, &format!("id={id}"));
        Ok(task)
    }

    fn find_mut(&mut self, op: &str, id: TaskId) -> RepoResult<&mut Task> {
        let Some(&slot) = self.index.get(&id) else {
            return Err(self.fail(op, RepoError::NotFound(id)));
        };
        self.slots[slot].as_mut().ok_or(RepoError::NotFound(id))
    }

    fn persist(&mut self, op: &str) -> RepoResult<()> {
        if self.unreadable_on_disk {
            self.store
                .set_aside_unreadable()
                .map_err(|err| self.fail(op, RepoError::Write(err)))?;
            self.unreadable_on_disk = false;
        }

        let tasks: Vec<Task> = self.iter().cloned().collect();
        self.store
            .save(&tasks)
            .map_err(|err| self.fail(op, RepoError::Write(err)))
    }

    fn fail(&self, op: &str, err: RepoError) -> RepoError {
        let kind = match &err {
            RepoError::Decode(_) => EventKind::StoreDecodeFailed,
            RepoError::Write(_) => EventKind::StoreWriteFailed,
            RepoError::Validation(_) | RepoError::NotFound(_) => EventKind::OperationFailed,
        };
        self.events.emit(kind, &format!("op={op} error={err}"));
        err
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        self.next_id = next_id(&tasks);
        self.slots = tasks.into_iter().map(Some).collect();
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (slot, task) in self.slots.iter().enumerate() {
            if let Some(task) = task {
                self.index.insert(task.id, slot);
            }
        }
    }

    /// Drops holes once they outnumber live tasks.
    fn compact_if_sparse(&mut self) {
        let holes = self.slots.len() - self.index.len();
        if holes > self.index.len() {
            self.slots.retain(Option::is_some);
            self.rebuild_index();
        }
    }
}
