//! Capture toggles

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One field category that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureToggle {
    Prompt,
    History,
    Context,
}

impl CaptureToggle {
    pub const ALL: [CaptureToggle; 3] = [
        CaptureToggle::Prompt,
        CaptureToggle::History,
        CaptureToggle::Context,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureToggle::Prompt => "prompt",
            CaptureToggle::History => "history",
            CaptureToggle::Context => "context",
        }
    }
}

impl fmt::Display for CaptureToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureToggle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt" => Ok(CaptureToggle::Prompt),
            "history" => Ok(CaptureToggle::History),
            "context" => Ok(CaptureToggle::Context),
            _ => Err(DomainError::UnknownToggle(s.to_string())),
        }
    }
}

/// Which field categories go into captured records.
///
/// Everything is enabled until the user says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureSettings {
    pub log_prompt: bool,
    pub log_history: bool,
    pub log_context: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            log_prompt: true,
            log_history: true,
            log_context: true,
        }
    }
}

impl CaptureSettings {
    pub fn none() -> Self {
        Self {
            log_prompt: false,
            log_history: false,
            log_context: false,
        }
    }

    pub fn with(mut self, toggle: CaptureToggle, enabled: bool) -> Self {
        self.set(toggle, enabled);
        self
    }

    pub fn is_enabled(&self, toggle: CaptureToggle) -> bool {
        match toggle {
            CaptureToggle::Prompt => self.log_prompt,
            CaptureToggle::History => self.log_history,
            CaptureToggle::Context => self.log_context,
        }
    }

    pub fn set(&mut self, toggle: CaptureToggle, enabled: bool) {
        match toggle {
            CaptureToggle::Prompt => self.log_prompt = enabled,
            CaptureToggle::History => self.log_history = enabled,
            CaptureToggle::Context => self.log_context = enabled,
        }
    }

    /// At least one category is enabled.
    pub fn any_enabled(&self) -> bool {
        self.log_prompt || self.log_history || self.log_context
    }
}
