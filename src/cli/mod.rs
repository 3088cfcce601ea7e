//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, toggle/signal input,
//! and the session runners.

pub mod app;
pub mod args;
pub mod catalog_cmd;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_session, SessionOptions, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
