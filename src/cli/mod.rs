//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, the interactive command
//! reader and the session runner.

pub mod app;
pub mod args;
pub mod commands;
pub mod config_cmd;
pub mod presenter;
pub mod session_app;

// Re-export commonly used types
pub use app::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecordOptions};
pub use commands::SessionCommand;
pub use presenter::Presenter;
pub use session_app::run_session;
