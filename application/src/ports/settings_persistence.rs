//! Port for persisting capture settings.
//!
//! The host persists settings with a keyed, debounced mechanism: callers
//! hand over the new value with [`commit_soon`](SettingsPersistencePort::commit_soon)
//! after every toggle and the implementation decides when to write.

use async_trait::async_trait;
use promptlog_domain::CaptureSettings;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings file: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait SettingsPersistencePort: Send + Sync {
    /// Stored settings, or `None` on first run.
    async fn load(&self) -> Result<Option<CaptureSettings>, SettingsError>;

    /// Schedule `settings` to be written. Rapid calls coalesce into one write.
    fn commit_soon(&self, settings: CaptureSettings);

    /// Write any pending value now.
    async fn flush(&self) -> Result<(), SettingsError>;
}

/// Settings that live only in memory.
pub struct NoSettingsPersistence;

#[async_trait]
impl SettingsPersistencePort for NoSettingsPersistence {
    async fn load(&self) -> Result<Option<CaptureSettings>, SettingsError> {
        Ok(None)
    }

    fn commit_soon(&self, _settings: CaptureSettings) {}

    async fn flush(&self) -> Result<(), SettingsError> {
        Ok(())
    }
}
