//! Command-line driver for the task list.
//!
//! # Responsibility
//! - Map subcommands onto controller operations against the configured store.
//! - Ask for yes/no confirmation on stdin before deleting.

use clap::{Parser, Subcommand};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tasklist_core::{
    default_log_level, init_logging, open_store, Confirm, ControllerError, ListChange,
    StoreBackend, Task, TaskId, TaskListConfig, TaskListController,
};

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Minimal persistent to-do list")]
struct Cli {
    /// Directory holding the task database or preference file.
    #[arg(long, env = "TASKLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage backend: `sqlite` or `prefs`.
    #[arg(long, env = "TASKLIST_BACKEND", value_parser = parse_backend)]
    backend: Option<StoreBackend>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a task.
    Add { text: String },
    /// Print all tasks as `<id>\t<description>`.
    List,
    /// Replace the description of a task.
    Edit { id: TaskId, text: String },
    /// Delete a task after confirmation.
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Mark a task as done (not persisted).
    Done { id: TaskId },
}

fn parse_backend(value: &str) -> Result<StoreBackend, String> {
    StoreBackend::parse(value).map_err(|err| err.to_string())
}

/// Reads a `y/N` answer from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm_delete(&mut self, task: &Task) -> bool {
        print!("Delete task {} \"{}\"? [y/N] ", task.id, task.description);
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = resolve_config(cli)?;
    let store = open_store(&config).map_err(|err| err.to_string())?;
    let mut controller = TaskListController::open(store).map_err(|err| err.to_string())?;
    info!(
        "event=cli_run module=cli status=start backend={}",
        config.backend.as_str()
    );

    let change = match &cli.command {
        Command::List => {
            for row in controller.adapter().rows() {
                println!("{}\t{}", row.task_id, row.text);
            }
            return Ok(());
        }
        Command::Add { text } => controller.add_task(text),
        Command::Edit { id, text } => controller.edit_task(*id, text),
        Command::Delete { id, yes: true } => controller.delete_task(*id, &mut |_: &Task| true),
        Command::Delete { id, yes: false } => controller.delete_task(*id, &mut StdinConfirm),
        Command::Done { id } => controller.mark_done(*id),
    }
    .map_err(|err| describe_error(&err))?;

    report(&controller, change);
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<TaskListConfig, String> {
    let mut config = TaskListConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    Ok(config)
}

fn report<S: tasklist_core::TaskStore>(controller: &TaskListController<S>, change: ListChange) {
    let adapter = controller.adapter();
    match change {
        ListChange::Inserted(index) | ListChange::Changed(index) => {
            if let Some(row) = adapter.bind(index) {
                println!("{}\t{}", row.task_id, row.text);
            }
        }
        ListChange::Removed(_) => println!("deleted ({} left)", adapter.item_count()),
        ListChange::Unchanged => println!("no change"),
        ListChange::Reset => println!("{} task(s)", adapter.item_count()),
    }
}

fn describe_error(err: &ControllerError) -> String {
    match err {
        ControllerError::Validation(_) => "task description cannot be empty".to_string(),
        other => other.to_string(),
    }
}
