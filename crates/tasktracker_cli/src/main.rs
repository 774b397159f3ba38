//! `task-tracker` binary entry point.
//!
//! # Responsibility
//! - Resolve configuration and start logging before the repository exists.
//! - Dispatch to a one-shot subcommand or the interactive menu.

mod args;
mod menu;

use args::Cli;
use clap::Parser;
use log::{error, info};
use std::io;
use std::process::ExitCode;
use tasktracker_core::{init_logging, JsonFileStore, LogEventSink, TaskRepository};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("Error: cannot determine current directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config = cli.resolve(&cwd);

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let mut repo = TaskRepository::open(JsonFileStore::new(&config.data_file), LogEventSink);
    if let Err(err) = menu::report_load_warning(&mut repo, &mut io::stderr()) {
        error!("event=load_warning module=cli status=error error={err}");
    }
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let result = match cli.command {
        Some(command) => menu::run_command(&mut repo, command, &mut output),
        None => {
            let stdin = io::stdin();
            menu::run_menu(&mut repo, &mut stdin.lock(), &mut output).map(|()| true)
        }
    };

    match result {
        Ok(true) => {
            info!("event=app_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
