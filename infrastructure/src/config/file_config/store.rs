//! Log store configuration from TOML (`[store]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [store]
//! transport = "remote"
//! path = "promptlog/prompt-log.jsonl"
//!
//! [store.remote]
//! base_url = "http://127.0.0.1:8000"
//! token_env = "PROMPTLOG_TOKEN"
//! timeout_secs = 30
//! ```

use super::expand_tilde;
use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use promptlog_domain::{DEFAULT_LOG_PATH, LogPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which transport realizes store operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreTransport {
    /// Files below `store.root`.
    #[default]
    Local,
    /// The host's HTTP file service.
    Remote,
}

/// Raw store configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    pub transport: StoreTransport,
    /// Root directory for the local transport (default: platform data dir)
    pub root: Option<String>,
    /// Logical log path, shared by both transports
    pub path: String,
    pub remote: FileRemoteConfig,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            transport: StoreTransport::Local,
            root: None,
            path: DEFAULT_LOG_PATH.to_string(),
            remote: FileRemoteConfig::default(),
        }
    }
}

impl FileStoreConfig {
    /// Parse `path` into a [`LogPath`].
    pub fn parse_log_path(&self) -> (Option<LogPath>, Vec<ConfigIssue>) {
        match LogPath::new(self.path.clone()) {
            Ok(path) => (Some(path), vec![]),
            Err(e) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidLogPath {
                        value: self.path.clone(),
                    },
                    format!("store.path: {}", e),
                )],
            ),
        }
    }

    /// Root directory for the local transport.
    ///
    /// Falls back to `$XDG_DATA_HOME/promptlog`, then the working directory.
    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => expand_tilde(root),
            None => dirs::data_dir()
                .map(|d| d.join("promptlog"))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Raw remote file-service configuration (`[store.remote]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRemoteConfig {
    pub base_url: String,
    /// Token sent in the CSRF header; takes precedence over `token_env`
    pub token: Option<String>,
    /// Environment variable holding the token
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for FileRemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token: None,
            token_env: "PROMPTLOG_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FileRemoteConfig {
    /// Configured token, else the value of `token_env`.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(&self.token_env).ok().filter(|t| !t.is_empty()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidBaseUrl {
                    value: self.base_url.clone(),
                },
                format!(
                    "store.remote.base_url: '{}' is not an http(s) URL",
                    self.base_url
                ),
            ));
        }
        if self.resolve_token().is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingToken {
                    env: self.token_env.clone(),
                },
                format!(
                    "store.remote: no token configured and ${} is unset; requests will likely be rejected",
                    self.token_env
                ),
            ));
        }
        issues
    }
}
