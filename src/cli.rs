use std::path::PathBuf;

use clap::Parser;

/// Single-session to-do list TUI.
/// Tasks live in memory and are gone when the program exits.
#[derive(Parser)]
#[command(name = "todo", version, about = "Session to-do list TUI")]
pub struct Cli {
    /// Write diagnostic logs to this file (defaults to todo.log in the
    /// system temp directory). Logs never go to the terminal.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
