//! Command-line arguments and resolved runtime configuration.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tasktracker_core::{default_log_level, TaskId};

const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Persistent personal task list.
///
/// Run without a subcommand for the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "task-tracker", version, long_about = None)]
pub struct Cli {
    /// JSON file holding the task list
    #[arg(long, env = "TASK_TRACKER_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long, env = "TASK_TRACKER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; defaults to the current directory
    #[arg(long, env = "TASK_TRACKER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show all tasks ordered by id
    List,
    /// Add a new task
    Add { description: String },
    /// Mark a task as complete
    Complete { id: TaskId },
    /// Replace a task description
    Update { id: TaskId, description: String },
    /// Delete a task
    Delete { id: TaskId },
    /// Set notes on a task; omit the text to clear them
    Notes { id: TaskId, text: Option<String> },
}

/// Settings the binary runs with after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Cli {
    /// Applies defaults relative to `cwd`.
    ///
    /// The log directory is made absolute because the logger requires it.
    pub fn resolve(&self, cwd: &Path) -> Config {
        let log_dir = match &self.log_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };
        Config {
            data_file: self.data_file.clone(),
            log_level: self
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        }
    }
}
