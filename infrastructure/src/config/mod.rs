//! Configuration file loading for promptlog
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PROMPTLOG_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./promptlog.toml` or `./.promptlog.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/promptlog/config.toml`
//! 5. Default values

mod file_config;
mod loader;
pub mod validation;

pub use file_config::{
    FileCaptureConfig, FileConfig, FileLoggingConfig, FileOutputConfig, FileRemoteConfig,
    FileStoreConfig, StoreTransport,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
