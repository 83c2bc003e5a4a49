//! `taskdeck` — local-first task tracker.
//!
//! Reads tasks from a JSON slot under the data directory, applies one
//! command, and writes the result back. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # List open tasks by priority
//! cargo run --bin taskdeck -- list --status active --sort priority
//!
//! # Add a task due tomorrow
//! cargo run --bin taskdeck -- add "Water plants" --due 2024-03-11 -p 2 -t 2
//!
//! # Keep data somewhere else
//! TASKDECK_DATA_DIR=/tmp/tasks cargo run --bin taskdeck -- stats
//! ```

use std::io;
use std::path::Path;
use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::cli::{self, Command, FilterArgs};
use taskdeck::config::{AppConfig, CliArgs};
use taskdeck::persist::{FileKeyValueStore, PersistenceBridge};
use taskdeck::store::TaskStore;

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::from_cli(&cli)
        }
    };

    // Logs go to a file so command output stays clean.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "taskdeck starting"
    );

    let bridge = PersistenceBridge::new(
        FileKeyValueStore::new(&config.data_dir),
        config.storage_key.clone(),
    );
    let now = Local::now();
    let mut store = TaskStore::open(bridge, now.with_timezone(&Utc));

    let command = cli
        .command
        .unwrap_or_else(|| Command::List(FilterArgs::default()));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = cli::run(command, &mut store, &config, &now, &mut out);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
