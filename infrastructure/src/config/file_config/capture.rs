//! Capture configuration from TOML (`[capture]` section)

use super::expand_tilde;
use promptlog_domain::DEFAULT_CAPTURE_EVENT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw capture configuration from TOML
///
/// # Example
///
/// ```toml
/// [capture]
/// event = "generation_ended"
/// settings_file = "~/.config/promptlog/settings.json"
/// debounce_ms = 500
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCaptureConfig {
    /// Host event the capture handler subscribes to
    pub event: String,
    /// Where capture toggles are persisted (default: next to the global config)
    pub settings_file: Option<String>,
    /// Delay before a toggle change is written
    pub debounce_ms: u64,
}

impl Default for FileCaptureConfig {
    fn default() -> Self {
        Self {
            event: DEFAULT_CAPTURE_EVENT.to_string(),
            settings_file: None,
            debounce_ms: 500,
        }
    }
}

impl FileCaptureConfig {
    pub fn settings_path(&self) -> PathBuf {
        match &self.settings_file {
            Some(path) => expand_tilde(path),
            None => dirs::config_dir()
                .map(|d| d.join("promptlog").join("settings.json"))
                .unwrap_or_else(|| PathBuf::from("promptlog-settings.json")),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
