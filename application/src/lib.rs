//! Application layer for promptlog
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    log_store::{LogStorePort, MemoryLogStore, StoreError, line_terminated},
    notifier::{CollectingNotifier, NoticeLevel, UserNotifier},
    settings_persistence::{NoSettingsPersistence, SettingsError, SettingsPersistencePort},
};
pub use use_cases::capture::{CaptureOutcome, CaptureSummary, CaptureUseCase};
pub use use_cases::init_settings::init_settings;
pub use use_cases::manage_log::{ExportOutcome, ManageLogUseCase};
