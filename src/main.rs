//! # todo - Session To-Do List
//!
//! A single-session to-do list for the terminal: add, edit, search,
//! complete and delete short tasks through a rapid TUI. Everything lives
//! in memory; when the program exits the list is gone.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! todo
//!
//! # With diagnostics written to a file of your choosing
//! todo --log-file /tmp/todo-debug.log --log-level debug
//! ```
//!
//! ## Key Behaviours
//!
//! - **Validated entry**: titles are 5-15 characters of letters, numbers
//!   and spaces; descriptions are 5-30 characters of anything. A rejected
//!   submission changes nothing and tells you which rule it broke.
//! - **Two lists**: active tasks (searchable) and completed tasks. A task
//!   moves to the completed list when you complete it; completed tasks can
//!   only be deleted.
//! - **Confirmation gate**: deletions ask first; declining is a no-op.
//! - **Transient notices**: add/update/delete outcomes flash in the status
//!   bar and dismiss themselves after three seconds.

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_appender::non_blocking::WorkerGuard;

pub mod cli;
pub mod controller;
pub mod notify;
pub mod task;
pub mod validate;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use tui::app::App;

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Logging must be up before ratatui takes the terminal over.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());
    tracing::info!("todo starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("todo exiting");
    res
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown
/// to ensure buffered entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("todo.log");
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
