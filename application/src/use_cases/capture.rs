//! Capture use case.
//!
//! Subscribes to one host event and, for every matching event, builds a
//! record with the [`CapturePolicy`], encodes it, and appends it to the log.
//!
//! Failures never propagate to the host: they are logged and reported
//! through the [`UserNotifier`], and the event loop moves on.

use crate::ports::log_store::LogStorePort;
use crate::ports::notifier::UserNotifier;
use crate::ports::settings_persistence::{NoSettingsPersistence, SettingsPersistencePort};
use chrono::{DateTime, SubsecRound, Utc};
use futures::{Stream, StreamExt};
use promptlog_domain::{
    CapturePolicy, CaptureSettings, CaptureToggle, DEFAULT_CAPTURE_EVENT, HostContext,
    HostEnvelope, HostEvent, LogPath, encode,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a single host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Not the subscribed event.
    Ignored,
    /// Nothing enabled or nothing to capture; no I/O performed.
    Skipped,
    Written,
    /// The record could not be written; the user has been notified.
    Failed,
}

/// Totals for one run over an event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    pub written: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub failed: usize,
}

impl CaptureSummary {
    fn record(&mut self, outcome: CaptureOutcome) {
        match outcome {
            CaptureOutcome::Ignored => self.ignored += 1,
            CaptureOutcome::Skipped => self.skipped += 1,
            CaptureOutcome::Written => self.written += 1,
            CaptureOutcome::Failed => self.failed += 1,
        }
    }
}

/// Capture-time clock, truncated to milliseconds like host timestamps.
fn capture_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Use case for capturing host events into the log.
///
/// Owns the capture settings; the UI changes them only through
/// [`set_toggle`](Self::set_toggle) / [`set_settings`](Self::set_settings),
/// which update the in-memory value before asking for persistence.
pub struct CaptureUseCase {
    store: Arc<dyn LogStorePort>,
    notifier: Arc<dyn UserNotifier>,
    settings_persistence: Arc<dyn SettingsPersistencePort>,
    policy: CapturePolicy,
    log_path: LogPath,
    event_name: String,
}

impl CaptureUseCase {
    pub fn new(
        store: Arc<dyn LogStorePort>,
        notifier: Arc<dyn UserNotifier>,
        log_path: LogPath,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            settings_persistence: Arc::new(NoSettingsPersistence),
            policy: CapturePolicy::new(settings),
            log_path,
            event_name: DEFAULT_CAPTURE_EVENT.to_string(),
        }
    }

    /// Subscribe to a different host event.
    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = event_name.into();
        self
    }

    /// Persist settings changes through `persistence`.
    pub fn with_settings_persistence(
        mut self,
        persistence: Arc<dyn SettingsPersistencePort>,
    ) -> Self {
        self.settings_persistence = persistence;
        self
    }

    pub fn settings(&self) -> &CaptureSettings {
        self.policy.settings()
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn log_path(&self) -> &LogPath {
        &self.log_path
    }

    /// Flip one toggle and schedule the new settings for persistence.
    pub fn set_toggle(&mut self, toggle: CaptureToggle, enabled: bool) {
        let settings = self.settings().with(toggle, enabled);
        self.set_settings(settings);
    }

    pub fn set_settings(&mut self, settings: CaptureSettings) {
        self.policy.set_settings(settings);
        self.settings_persistence.commit_soon(settings);
    }

    /// Handle one host event.
    pub async fn handle(&self, event: HostEvent, context: HostContext) -> CaptureOutcome {
        if event.name != self.event_name {
            return CaptureOutcome::Ignored;
        }

        if !self.policy.should_capture(&event) {
            debug!("Skipping {} event: nothing to capture", event.name);
            return CaptureOutcome::Skipped;
        }

        let record = self.policy.build_record(&event, &context, capture_time());
        let line = match encode(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not encode record: {}", e);
                self.notifier.error(&format!("Prompt log: {}", e));
                return CaptureOutcome::Failed;
            }
        };

        match self.store.append(&self.log_path, &format!("{line}\n")).await {
            Ok(()) => {
                debug!(
                    "Appended record ({} bytes, fields: {:?}) to {} via {}",
                    line.len(),
                    record.data.keys(),
                    self.log_path,
                    self.store.transport()
                );
                CaptureOutcome::Written
            }
            Err(e) => {
                warn!(
                    "Failed to append to {} via {}: {}",
                    self.log_path,
                    self.store.transport(),
                    e
                );
                self.notifier
                    .error(&format!("Failed to write prompt log: {}", e));
                CaptureOutcome::Failed
            }
        }
    }

    /// Process a host event stream to completion, one event at a time.
    pub async fn run<S>(&self, events: S) -> CaptureSummary
    where
        S: Stream<Item = HostEnvelope>,
    {
        info!(
            "Capturing '{}' events into {} ({})",
            self.event_name,
            self.log_path,
            self.store.transport()
        );

        let mut events = std::pin::pin!(events);
        let mut summary = CaptureSummary::default();
        while let Some(envelope) = events.next().await {
            let (event, context) = envelope.into_parts();
            summary.record(self.handle(event, context).await);
        }

        info!(
            "Capture finished: {} written, {} skipped, {} ignored, {} failed",
            summary.written, summary.skipped, summary.ignored, summary.failed
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::log_store::MemoryLogStore;
    use crate::ports::notifier::{CollectingNotifier, NoticeLevel};
    use crate::ports::settings_persistence::SettingsError;
    use async_trait::async_trait;
    use promptlog_domain::{DecodedLine, decode_log};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPersistence {
        commits: Mutex<Vec<CaptureSettings>>,
    }

    #[async_trait]
    impl SettingsPersistencePort for RecordingPersistence {
        async fn load(&self) -> Result<Option<CaptureSettings>, SettingsError> {
            Ok(None)
        }

        fn commit_soon(&self, settings: CaptureSettings) {
            self.commits.lock().unwrap().push(settings);
        }

        async fn flush(&self) -> Result<(), SettingsError> {
            Ok(())
        }
    }

    fn use_case(
        store: Arc<MemoryLogStore>,
        notifier: Arc<CollectingNotifier>,
        settings: CaptureSettings,
    ) -> CaptureUseCase {
        CaptureUseCase::new(store, notifier, LogPath::default(), settings)
    }

    fn context() -> HostContext {
        HostContext {
            name2: json!("Seraphina"),
            ..Default::default()
        }
    }

    fn event(payload: serde_json::Value) -> HostEvent {
        HostEvent::new(DEFAULT_CAPTURE_EVENT, payload)
    }

    #[tokio::test]
    async fn test_prompt_only_record_written() {
        let store = Arc::new(MemoryLogStore::new());
        let notifier = Arc::new(CollectingNotifier::new());
        let settings = CaptureSettings {
            log_prompt: true,
            log_history: false,
            log_context: false,
        };
        let capture = use_case(store.clone(), notifier.clone(), settings);

        let outcome = capture
            .handle(event(json!({ "finalPrompt": "hello" })), context())
            .await;
        assert_eq!(outcome, CaptureOutcome::Written);

        let raw = store.contents(&LogPath::default()).unwrap();
        assert!(raw.ends_with('\n'));
        let lines: Vec<_> = decode_log(&raw).collect();
        assert_eq!(lines.len(), 1);
        let DecodedLine::Record(record) = &lines[0] else {
            panic!("expected a record");
        };
        assert_eq!(
            serde_json::to_value(&record.data).unwrap(),
            json!({ "finalPrompt": "hello" })
        );
        assert_eq!(record.character_name, "Seraphina");
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_empty_event_performs_no_io() {
        let store = Arc::new(MemoryLogStore::new());
        let capture = use_case(
            store.clone(),
            Arc::new(CollectingNotifier::new()),
            CaptureSettings::default(),
        );

        let outcome = capture.handle(event(json!({})), context()).await;
        assert_eq!(outcome, CaptureOutcome::Skipped);
        assert_eq!(store.operations(), 0);
    }

    #[tokio::test]
    async fn test_other_events_are_ignored() {
        let store = Arc::new(MemoryLogStore::new());
        let capture = use_case(
            store.clone(),
            Arc::new(CollectingNotifier::new()),
            CaptureSettings::default(),
        )
        .with_event_name("message_sent");

        let outcome = capture
            .handle(event(json!({ "prompt": "x" })), context())
            .await;
        assert_eq!(outcome, CaptureOutcome::Ignored);
        assert_eq!(store.operations(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_notified_not_raised() {
        let store = Arc::new(MemoryLogStore::failing());
        let notifier = Arc::new(CollectingNotifier::new());
        let capture = use_case(store, notifier.clone(), CaptureSettings::default());

        let outcome = capture
            .handle(event(json!({ "prompt": "x" })), context())
            .await;
        assert_eq!(outcome, CaptureOutcome::Failed);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
    }

    #[tokio::test]
    async fn test_sequential_appends_keep_order() {
        let store = Arc::new(MemoryLogStore::new());
        let capture = use_case(
            store.clone(),
            Arc::new(CollectingNotifier::new()),
            CaptureSettings::default(),
        );

        capture.handle(event(json!({ "prompt": "A" })), context()).await;
        capture.handle(event(json!({ "prompt": "B" })), context()).await;

        let raw = store.contents(&LogPath::default()).unwrap();
        let prompts: Vec<_> = decode_log(&raw)
            .map(|line| match line {
                DecodedLine::Record(r) => r.data.prompt.unwrap(),
                DecodedLine::Raw(raw) => panic!("unexpected raw line {raw}"),
            })
            .collect();
        assert_eq!(prompts, vec!["A", "B"]);
        assert_eq!(raw.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_run_summarizes_stream() {
        let store = Arc::new(MemoryLogStore::new());
        let capture = use_case(
            store.clone(),
            Arc::new(CollectingNotifier::new()),
            CaptureSettings::default(),
        );
        let envelope = |name: &str, payload| HostEnvelope {
            event: name.to_string(),
            payload,
            context: context(),
        };

        let summary = capture
            .run(futures::stream::iter(vec![
                envelope(DEFAULT_CAPTURE_EVENT, json!({ "prompt": "1" })),
                envelope("chat_changed", json!({ "prompt": "2" })),
                envelope(DEFAULT_CAPTURE_EVENT, json!({})),
                envelope(DEFAULT_CAPTURE_EVENT, json!({ "finalPrompt": "3" })),
            ]))
            .await;

        assert_eq!(
            summary,
            CaptureSummary {
                written: 2,
                skipped: 1,
                ignored: 1,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_envelope_with_odd_context_is_captured() {
        let store = Arc::new(MemoryLogStore::new());
        let capture = use_case(
            store.clone(),
            Arc::new(CollectingNotifier::new()),
            CaptureSettings::default(),
        );
        let envelope: HostEnvelope = serde_json::from_value(json!({
            "event": DEFAULT_CAPTURE_EVENT,
            "payload": { "finalPrompt": "hello" },
            "context": { "name2": 42, "chat": { "0": { "mes": "hi" } } },
        }))
        .unwrap();

        let summary = capture.run(futures::stream::iter(vec![envelope])).await;
        assert_eq!(summary.written, 1);

        let raw = store.contents(&LogPath::default()).unwrap();
        let DecodedLine::Record(record) = decode_log(&raw).next().unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(record.character_name, "");
        assert_eq!(record.data.final_prompt.as_deref(), Some("hello"));
        assert!(record.data.message_history.is_none());
    }

    #[tokio::test]
    async fn test_toggle_updates_memory_then_persists() {
        let persistence = Arc::new(RecordingPersistence::default());
        let mut capture = use_case(
            Arc::new(MemoryLogStore::new()),
            Arc::new(CollectingNotifier::new()),
            CaptureSettings::default(),
        )
        .with_settings_persistence(persistence.clone());

        capture.set_toggle(CaptureToggle::Context, false);

        assert!(!capture.settings().log_context);
        assert_eq!(
            *persistence.commits.lock().unwrap(),
            vec![CaptureSettings::default().with(CaptureToggle::Context, false)]
        );
    }
}
