//! JSON file storage for the task collection.
//!
//! # Responsibility
//! - Round-trip the full collection through one pretty-printed JSON array.
//! - Replace the file atomically on save (temp file + rename).
//!
//! # Invariants
//! - Load never modifies the file, even when it cannot be decoded.
//! - Unreadable content is renamed to `<name>.corrupt-<n>`, never deleted.
//! - A reader never observes a partially written collection.

use super::{DecodeReason, Loaded, StoreError, StoreResult, TaskStore};
use crate::model::task::{validate_ids, Task};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const FALLBACK_FILE_NAME: &str = "tasks.json";
const MAX_SET_ASIDE_COPIES: u32 = 1000;

/// Task store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_file_name(format!(".{}.tmp", self.file_name()))
    }

    /// First `<name>.corrupt-<n>` sibling that does not exist yet.
    fn set_aside_path(&self) -> std::io::Result<PathBuf> {
        let name = self.file_name();
        (1..=MAX_SET_ASIDE_COPIES)
            .map(|n| self.path.with_file_name(format!("{name}.corrupt-{n}")))
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| {
                std::io::Error::new(
                    ErrorKind::AlreadyExists,
                    format!("{MAX_SET_ASIDE_COPIES} set-aside copies of `{name}` already exist"),
                )
            })
    }

    fn degraded(&self, started_at: Instant, reason: DecodeReason) -> Loaded {
        warn!(
            "event=store_load module=store status=error duration_ms={} error_code=decode_failed path={} error={}",
            started_at.elapsed().as_millis(),
            self.path.display(),
            reason
        );
        Loaded::degraded(StoreError::Decode {
            path: self.path.clone(),
            reason,
        })
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Loaded {
        let started_at = Instant::now();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=ok source=missing count=0 path={}",
                    self.path.display()
                );
                return Loaded::default();
            }
            Err(err) => return self.degraded(started_at, DecodeReason::Io(err)),
        };

        let tasks: Vec<Task> = match serde_json::from_slice(&bytes) {
            Ok(tasks) => tasks,
            Err(err) => return self.degraded(started_at, DecodeReason::Json(err)),
        };
        if let Err(err) = validate_ids(&tasks) {
            return self.degraded(started_at, DecodeReason::Invalid(err));
        }

        info!(
            "event=store_load module=store status=ok source=file count={} duration_ms={} path={}",
            tasks.len(),
            started_at.elapsed().as_millis(),
            self.path.display()
        );
        Loaded::ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let started_at = Instant::now();

        let mut data = match serde_json::to_vec_pretty(tasks) {
            Ok(data) => data,
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code=encode_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };
        data.push(b'\n');

        match replace_file(&self.path, &self.temp_path(), &data) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok count={} duration_ms={} path={}",
                    tasks.len(),
                    started_at.elapsed().as_millis(),
                    self.path.display()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code=write_failed path={} error={}",
                    started_at.elapsed().as_millis(),
                    self.path.display(),
                    err
                );
                Err(StoreError::Write {
                    path: self.path.clone(),
                    source: err,
                })
            }
        }
    }

    fn set_aside_unreadable(&self) -> StoreResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        match self
            .set_aside_path()
            .and_then(|target| fs::rename(&self.path, &target).map(|()| target))
        {
            Ok(target) => {
                warn!(
                    "event=store_set_aside module=store status=ok path={} moved_to={}",
                    self.path.display(),
                    target.display()
                );
                Ok(Some(target))
            }
            Err(err) => {
                error!(
                    "event=store_set_aside module=store status=error error_code=set_aside_failed path={} error={}",
                    self.path.display(),
                    err
                );
                Err(StoreError::Write {
                    path: self.path.clone(),
                    source: err,
                })
            }
        }
    }
}

fn replace_file(path: &Path, temp_path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let result = write_synced(temp_path, data).and_then(|()| fs::rename(temp_path, path));
    if result.is_err() {
        // Best effort; the original error is what the caller needs.
        let _ = fs::remove_file(temp_path);
    }
    result
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
