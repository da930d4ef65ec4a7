//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid log path '{path}': {reason}")]
    InvalidLogPath { path: String, reason: &'static str },

    #[error("Unknown capture toggle: {0}")]
    UnknownToggle(String),
}

impl DomainError {
    /// Check if this error comes from log path validation
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, DomainError::InvalidLogPath { .. })
    }
}
