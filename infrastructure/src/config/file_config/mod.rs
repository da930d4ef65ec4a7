//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod capture;
mod logging;
mod output;
mod store;

pub use capture::FileCaptureConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use store::{FileRemoteConfig, FileStoreConfig, StoreTransport};

use super::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Log store settings
    pub store: FileStoreConfig,
    /// Capture subscription and settings persistence
    pub capture: FileCaptureConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.store.parse_log_path().1);

        if self.store.transport == StoreTransport::Remote {
            if cfg!(feature = "remote") {
                issues.extend(self.store.remote.validate());
            } else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::RemoteUnsupported,
                    "store.transport = \"remote\" but this build has no remote support",
                ));
            }
        }

        if self.capture.event.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyEventName,
                "capture.event must name a host event",
            ));
        }

        issues
    }
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
