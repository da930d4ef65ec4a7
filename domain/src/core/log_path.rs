//! Logical path of the log resource.
//!
//! A [`LogPath`] names the log independently of the transport: the local
//! store resolves it below a root directory, the remote store sends it as-is
//! to the file service.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default logical location of the prompt log.
pub const DEFAULT_LOG_PATH: &str = "promptlog/prompt-log.jsonl";

/// A validated, relative, `/`-separated logical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogPath(String);

impl LogPath {
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        let invalid = |reason| DomainError::InvalidLogPath {
            path: path.clone(),
            reason,
        };

        if path.is_empty() {
            return Err(invalid("path is empty"));
        }
        if path.starts_with('/') || path.starts_with('\\') || path.contains(':') {
            return Err(invalid("path must be relative"));
        }
        if path.contains('\\') {
            return Err(invalid("use '/' as the separator"));
        }
        for segment in path.split('/') {
            match segment {
                "" => return Err(invalid("path contains an empty segment")),
                "." | ".." => return Err(invalid("path must not contain '.' or '..'")),
                _ => {}
            }
        }

        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Logical parent directory, if the path is nested.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(dir, _)| dir)
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl Default for LogPath {
    fn default() -> Self {
        Self(DEFAULT_LOG_PATH.to_string())
    }
}

impl FromStr for LogPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LogPath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogPath> for String {
    fn from(path: LogPath) -> Self {
        path.0
    }
}

impl fmt::Display for LogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
