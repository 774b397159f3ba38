//! Interactive menu and one-shot command execution.
//!
//! # Responsibility
//! - Translate user input into repository calls.
//! - Translate repository results into user-facing lines.
//!
//! # Invariants
//! - Repository errors are printed, never fatal; only I/O on the terminal
//!   itself aborts the loop.
//! - End of input behaves like choosing "Exit".

use crate::args::Command;
use log::info;
use std::io::{self, BufRead, Write};
use tasktracker_core::{EventSink, RepoResult, Task, TaskId, TaskRepository, TaskStore};

const MENU: &str = "\nTask Tracker Menu
1. View tasks
2. Add a new task
3. Mark a task as complete
4. Delete a task
5. Update a task description
6. Set task notes
7. Exit";

/// A repository mutation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Complete(TaskId),
    Update(TaskId, String),
    Delete(TaskId),
    Notes(TaskId, Option<String>),
}

/// Runs `action` and returns the confirmation line to show.
pub fn apply<S: TaskStore, E: EventSink>(
    repo: &mut TaskRepository<S, E>,
    action: &Action,
) -> RepoResult<String> {
    match action {
        Action::Add(description) => repo
            .add(description)
            .map(|task| format!("Task {} added successfully.", task.id)),
        Action::Complete(id) => repo.complete(*id).map(|changed| {
            if changed {
                format!("Task {id} marked as complete.")
            } else {
                format!("Task {id} is already marked as complete.")
            }
        }),
        Action::Update(id, description) => repo
            .update(*id, description)
            .map(|()| format!("Task {id} updated.")),
        Action::Delete(id) => repo
            .delete(*id)
            .map(|_| format!("Task {id} deleted successfully.")),
        Action::Notes(id, notes) => repo
            .set_notes(*id, notes.as_deref())
            .map(|()| format!("Notes for task {id} saved.")),
    }
}

/// Writes tasks in display order, or a hint when there are none.
pub fn render_tasks<W: Write>(tasks: &[&Task], output: &mut W) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(output, "\nNo tasks found. Add one!");
    }

    writeln!(output, "\n--- Your Tasks ---")?;
    for task in tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        writeln!(output, "[{mark}] [{}] {}", task.id, task.description)?;
        if let Some(notes) = &task.notes {
            writeln!(output, "      notes: {notes}")?;
        }
    }
    writeln!(output, "------------------")
}

/// Writes the decode warning from opening the repository, if any, to `errors`.
pub fn report_load_warning<S: TaskStore, E: EventSink, W: Write>(
    repo: &mut TaskRepository<S, E>,
    errors: &mut W,
) -> io::Result<()> {
    match repo.take_load_warning() {
        Some(warning) => writeln!(errors, "Warning: {warning}"),
        None => Ok(()),
    }
}

/// Executes one subcommand.
///
/// Returns `Ok(false)` when the repository rejected it; the error has already
/// been written to `output`.
pub fn run_command<S: TaskStore, E: EventSink, W: Write>(
    repo: &mut TaskRepository<S, E>,
    command: Command,
    output: &mut W,
) -> io::Result<bool> {
    let action = match command {
        Command::List => {
            render_tasks(&repo.list(), output)?;
            return Ok(true);
        }
        Command::Add { description } => Action::Add(description),
        Command::Complete { id } => Action::Complete(id),
        Command::Update { id, description } => Action::Update(id, description),
        Command::Delete { id } => Action::Delete(id),
        Command::Notes { id, text } => Action::Notes(id, text),
    };
    report(apply(repo, &action), output)
}

/// Runs the numbered menu until the user exits or input ends.
pub fn run_menu<S, E, R, W>(
    repo: &mut TaskRepository<S, E>,
    input: &mut R,
    output: &mut W,
) -> io::Result<()>
where
    S: TaskStore,
    E: EventSink,
    R: BufRead,
    W: Write,
{
    info!("event=menu_start module=cli status=ok tasks={}", repo.len());

    loop {
        writeln!(output, "{MENU}")?;
        let Some(choice) = prompt(input, output, "Enter your choice: ")? else {
            break;
        };

        let action = match choice.as_str() {
            "1" => {
                render_tasks(&repo.list(), output)?;
                continue;
            }
            "2" => match prompt(input, output, "Enter task description: ")? {
                Some(description) => Action::Add(description),
                None => break,
            },
            "3" => match prompt_id(input, output, "complete")? {
                Answer::Value(id) => Action::Complete(id),
                Answer::Invalid => continue,
                Answer::Eof => break,
            },
            "4" => match prompt_id(input, output, "delete")? {
                Answer::Value(id) => Action::Delete(id),
                Answer::Invalid => continue,
                Answer::Eof => break,
            },
            "5" => {
                let id = match prompt_id(input, output, "update")? {
                    Answer::Value(id) => id,
                    Answer::Invalid => continue,
                    Answer::Eof => break,
                };
                match prompt(input, output, "Enter the new description: ")? {
                    Some(description) => Action::Update(id, description),
                    None => break,
                }
            }
            "6" => {
                let id = match prompt_id(input, output, "annotate")? {
                    Answer::Value(id) => id,
                    Answer::Invalid => continue,
                    Answer::Eof => break,
                };
                match prompt(input, output, "Enter notes (leave blank to clear): ")? {
                    Some(notes) => Action::Notes(id, Some(notes)),
                    None => break,
                }
            }
            "7" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            _ => {
                writeln!(output, "Invalid choice. Please try again.")?;
                continue;
            }
        };

        report(apply(repo, &action), output)?;
    }

    info!("event=menu_exit module=cli status=ok");
    Ok(())
}

enum Answer<T> {
    Value(T),
    Invalid,
    Eof,
}

fn report<W: Write>(result: RepoResult<String>, output: &mut W) -> io::Result<bool> {
    match result {
        Ok(message) => {
            writeln!(output, "{message}")?;
            Ok(true)
        }
        Err(err) => {
            writeln!(output, "Error: {err}")?;
            Ok(false)
        }
    }
}

/// Reads one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_id<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    verb: &str,
) -> io::Result<Answer<TaskId>> {
    let label = format!("Enter the ID of the task to {verb}: ");
    let Some(raw) = prompt(input, output, &label)? else {
        return Ok(Answer::Eof);
    };
    match raw.parse::<TaskId>() {
        Ok(id) => Ok(Answer::Value(id)),
        Err(_) => {
            writeln!(output, "Error: Please enter a valid number for the task ID.")?;
            Ok(Answer::Invalid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{report_load_warning, run_command, run_menu};
    use crate::args::Command;
    use std::io::Cursor;
    use tasktracker_core::{JsonFileStore, NoopEventSink, TaskRepository};

    fn repo_in(dir: &tempfile::TempDir) -> TaskRepository<JsonFileStore, NoopEventSink> {
        TaskRepository::open(
            JsonFileStore::new(dir.path().join("tasks.json")),
            NoopEventSink,
        )
    }

    fn drive(repo: &mut TaskRepository<JsonFileStore, NoopEventSink>, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run_menu(repo, &mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn menu_adds_completes_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo_in(&dir);

        let out = drive(&mut repo, "2\nBuy milk\n3\n1\n1\n7\n");

        assert!(out.contains("Task 1 added successfully."));
        assert!(out.contains("Task 1 marked as complete."));
        assert!(out.contains("[x] [1] Buy milk"));
        assert!(out.ends_with("Goodbye!\n"));
        assert!(repo_in(&dir).get(1).unwrap().completed);
    }

    #[test]
    fn menu_reports_errors_and_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo_in(&dir);

        let out = drive(&mut repo, "2\n   \n4\nabc\n4\n9\n9\n1\n");

        assert!(out.contains("Error: task description cannot be empty"));
        assert!(out.contains("Error: Please enter a valid number for the task ID."));
        assert!(out.contains("Error: task with id 9 not found"));
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("No tasks found. Add one!"));
    }

    #[test]
    fn menu_sets_notes_and_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo_in(&dir);
        repo.add("Groceries").unwrap();

        let out = drive(&mut repo, "6\n1\noat milk\n5\n1\nWeekly groceries\n1\n");

        assert!(out.contains("Notes for task 1 saved."));
        assert!(out.contains("Task 1 updated."));
        assert!(out.contains("[ ] [1] Weekly groceries\n      notes: oat milk"));
        assert!(!out.contains("Goodbye!"));
    }

    #[test]
    fn load_warning_goes_to_error_stream_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tasks.json"), "not json").unwrap();
        let mut repo = repo_in(&dir);
        let mut errors = Vec::new();

        report_load_warning(&mut repo, &mut errors).unwrap();
        report_load_warning(&mut repo, &mut errors).unwrap();

        let text = String::from_utf8(errors).unwrap();
        assert!(text.starts_with("Warning: could not decode tasks from"));
        assert_eq!(text.matches("Warning:").count(), 1);
    }

    #[test]
    fn run_command_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo_in(&dir);
        let mut output = Vec::new();

        assert!(run_command(
            &mut repo,
            Command::Add {
                description: "Call mom".to_string()
            },
            &mut output
        )
        .unwrap());
        assert!(!run_command(&mut repo, Command::Complete { id: 2 }, &mut output).unwrap());
        assert!(run_command(&mut repo, Command::List, &mut output).unwrap());

        let out = String::from_utf8(output).unwrap();
        assert!(out.contains("Error: task with id 2 not found"));
        assert!(out.contains("[ ] [1] Call mom"));
    }
}
