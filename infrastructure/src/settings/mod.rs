//! Capture settings persistence.

mod json_file;

pub use json_file::{JsonSettingsFile, SETTINGS_KEY};
