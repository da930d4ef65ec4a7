//! Console notifier
//!
//! Notices go to stderr so that `view` output on stdout stays pipeable.

use colored::Colorize;
use promptlog_application::{NoticeLevel, UserNotifier};

/// Prints notices to stderr, colored by level
pub struct ConsoleNotifier {
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Format a notice line without printing it
    pub fn format(&self, level: NoticeLevel, message: &str) -> String {
        let label = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        if !self.color {
            return format!("[{}] {}", label, message);
        }
        let label = match level {
            NoticeLevel::Info => label.cyan().bold(),
            NoticeLevel::Success => label.green().bold(),
            NoticeLevel::Warning => label.yellow().bold(),
            NoticeLevel::Error => label.red().bold(),
        };
        format!("[{}] {}", label, message)
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl UserNotifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        eprintln!("{}", self.format(level, message));
    }
}
