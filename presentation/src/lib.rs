//! Presentation layer for promptlog
//!
//! This crate contains CLI definitions, the log renderer,
//! the viewer panel state, and the console notifier.

pub mod cli;
pub mod notify;
pub mod output;
pub mod viewer;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ToggleArg};
pub use notify::console::ConsoleNotifier;
pub use output::log_formatter::{EMPTY_LOG_PLACEHOLDER, LogFormatter};
pub use viewer::LogViewer;
