//! Output configuration from TOML (`[output]` section)

use super::expand_tilde;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Directory exports are written to (default: current directory)
    pub export_dir: Option<String>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            export_dir: None,
        }
    }
}

impl FileOutputConfig {
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
