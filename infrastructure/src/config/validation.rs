//! Configuration validation issues.
//!
//! [`FileConfig::validate`](super::FileConfig::validate) reports problems as
//! structured issues instead of failing on the first one, so the CLI can
//! show every warning and stop only on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `store.path` is not a valid logical path.
    InvalidLogPath { value: String },
    /// Remote transport selected but no token configured or in the environment.
    MissingToken { env: String },
    /// `store.remote.base_url` is not an http(s) URL.
    InvalidBaseUrl { value: String },
    /// Remote transport selected in a build without remote support.
    RemoteUnsupported,
    /// `capture.event` is empty.
    EmptyEventName,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
