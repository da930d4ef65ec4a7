//! Load capture settings at startup.
//!
//! First run (nothing stored) initializes every toggle to on and schedules
//! that value for persistence. An unreadable store falls back to the same
//! defaults without overwriting what is on disk.

use crate::ports::notifier::UserNotifier;
use crate::ports::settings_persistence::SettingsPersistencePort;
use promptlog_domain::CaptureSettings;
use tracing::{debug, warn};

pub async fn init_settings(
    persistence: &dyn SettingsPersistencePort,
    notifier: &dyn UserNotifier,
) -> CaptureSettings {
    match persistence.load().await {
        Ok(Some(settings)) => {
            debug!("Loaded capture settings: {:?}", settings);
            settings
        }
        Ok(None) => {
            debug!("No stored capture settings, enabling everything");
            let settings = CaptureSettings::default();
            persistence.commit_soon(settings);
            settings
        }
        Err(e) => {
            warn!("Could not load capture settings: {}", e);
            notifier.warning(&format!("Using default capture settings: {}", e));
            CaptureSettings::default()
        }
    }
}
