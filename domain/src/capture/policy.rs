//! Capture policy: decides what goes into a record.
//!
//! [`CapturePolicy`] owns the current [`CaptureSettings`] and turns a host
//! event plus a context snapshot into one [`LogRecord`]. Fields whose toggle
//! is off, or whose source is missing, are left out of the record entirely.

use super::event::{HostContext, HostEvent, PromptField};
use super::settings::CaptureSettings;
use crate::record::entities::{LogRecord, RecordData};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturePolicy {
    settings: CaptureSettings,
}

impl CapturePolicy {
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CaptureSettings) {
        self.settings = settings;
    }

    /// Capture happens only with something enabled and something to capture.
    pub fn should_capture(&self, event: &HostEvent) -> bool {
        self.settings.any_enabled() && !event.is_empty()
    }

    /// Assemble the record for `event`.
    ///
    /// `now` becomes the record timestamp; host-supplied times are ignored.
    pub fn build_record(
        &self,
        event: &HostEvent,
        context: &HostContext,
        now: DateTime<Utc>,
    ) -> LogRecord {
        let mut data = RecordData::default();

        if self.settings.log_prompt {
            match event.prompt() {
                Some(PromptField::Final(text)) => data.final_prompt = Some(text.to_string()),
                Some(PromptField::Plain(text)) => data.prompt = Some(text.to_string()),
                None => {}
            }
        }

        if self.settings.log_history {
            data.message_history = event
                .message_history()
                .or_else(|| context.chat_history())
                .map(<[_]>::to_vec);
        }

        if self.settings.log_context {
            data.context = Some(context.snapshot());
        }

        LogRecord::new(now, context.character_name()).with_data(data)
    }
}
