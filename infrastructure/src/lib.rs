//! Infrastructure layer for promptlog
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the local and remote log stores, the host
//! event stream reader, settings persistence, and configuration loading.

pub mod config;
pub mod events;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileCaptureConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileRemoteConfig, FileStoreConfig, Severity, StoreTransport,
};
pub use events::jsonl_event_stream;
pub use settings::{JsonSettingsFile, SETTINGS_KEY};
#[cfg(feature = "remote")]
pub use store::RemoteFileLogStore;
pub use store::{LocalFileLogStore, build_log_store};
