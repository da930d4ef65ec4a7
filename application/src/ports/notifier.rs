//! User notification port
//!
//! Failures of user-visible actions are reported as transient notices, never
//! as errors that abort the host. Implementations live in the presentation
//! layer (console output, toasts, ...).

use std::sync::Mutex;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Callback for user-facing notices
pub trait UserNotifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NoticeLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Notifier that keeps every notice, for assertions in tests.
#[derive(Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices().into_iter().map(|(level, _)| level).collect()
    }
}

impl UserNotifier for CollectingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((level, message.to_string()));
        }
    }
}
