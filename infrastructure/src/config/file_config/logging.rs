//! Diagnostic logging configuration from TOML (`[logging]` section)

use super::expand_tilde;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write diagnostics to this file
    pub file: Option<String>,
}

impl FileLoggingConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_tilde)
    }
}
