//! Interactive contact book entry point.
//!
//! # Responsibility
//! - Turn command-line flags and environment into a `BookConfig`.
//! - Optionally start file logging, load the book, then hand off to the shell.

mod shell;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use contactbook_core::{
    core_version, default_log_level, init_logging, BookConfig, ContactBook, UndoPolicy,
    DEFAULT_DATA_FILE,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contactbook", version, about = "Single-user contact book")]
struct Cli {
    /// Contact file, rewritten after every change
    #[arg(long, env = "CONTACTBOOK_FILE", default_value = DEFAULT_DATA_FILE)]
    file: PathBuf,

    /// How undo treats updates and deletes
    #[arg(long, env = "CONTACTBOOK_UNDO_POLICY", value_enum, default_value_t = CliUndoPolicy::Retract)]
    undo_policy: CliUndoPolicy,

    /// Directory for rotating log files; logging is off when unset
    #[arg(long, env = "CONTACTBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "CONTACTBOOK_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliUndoPolicy {
    /// Undo removes the last added or updated contact
    Retract,
    /// Undo restores the state before the last change
    Revert,
}

impl From<CliUndoPolicy> for UndoPolicy {
    fn from(value: CliUndoPolicy) -> Self {
        match value {
            CliUndoPolicy::Retract => UndoPolicy::Retract,
            CliUndoPolicy::Revert => UndoPolicy::Revert,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = std::path::absolute(log_dir)
            .with_context(|| format!("cannot resolve log directory `{}`", log_dir.display()))?;
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("Warning: logging disabled: {err}");
        }
    }

    let config = BookConfig {
        data_file: cli.file,
        undo_policy: cli.undo_policy.into(),
    };
    let (mut book, report) = ContactBook::open(&config);
    shell::print_load_report(&report);

    println!(
        "contactbook {} (undo policy: {})",
        core_version(),
        config.undo_policy
    );
    shell::run(&mut book)
}
