//! Log viewer panel state
//!
//! Every action catches its own store failure: the error is logged, the user
//! gets a notice, and the viewer keeps working.

use crate::output::log_formatter::{EMPTY_LOG_PLACEHOLDER, LogFormatter};
use chrono::NaiveDate;
use promptlog_application::{ExportOutcome, ManageLogUseCase, UserNotifier};
use promptlog_domain::ExportBlob;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub struct LogViewer {
    manage: ManageLogUseCase,
    notifier: Arc<dyn UserNotifier>,
    displayed: String,
    open: bool,
}

impl LogViewer {
    pub fn new(manage: ManageLogUseCase, notifier: Arc<dyn UserNotifier>) -> Self {
        Self {
            manage,
            notifier,
            displayed: EMPTY_LOG_PLACEHOLDER.to_string(),
            open: false,
        }
    }

    /// Text currently shown in the panel.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the panel with the current log contents.
    pub async fn open(&mut self) -> &str {
        self.open = true;
        self.refresh().await
    }

    /// Reload and re-render the log. On failure the previous text stays.
    pub async fn refresh(&mut self) -> &str {
        match self.manage.read_raw().await {
            Ok(raw) => self.displayed = LogFormatter::render(&raw),
            Err(e) => {
                warn!("Failed to read {}: {}", self.manage.log_path(), e);
                self.notifier.error("Failed to load logs");
            }
        }
        &self.displayed
    }

    /// Remove all records and reset the panel to the placeholder.
    pub async fn clear(&mut self) -> bool {
        match self.manage.clear().await {
            Ok(()) => {
                self.displayed = EMPTY_LOG_PLACEHOLDER.to_string();
                info!("Cleared {}", self.manage.log_path());
                self.notifier.success("Logs cleared");
                true
            }
            Err(e) => {
                warn!("Failed to clear {}: {}", self.manage.log_path(), e);
                self.notifier.error("Failed to clear logs");
                false
            }
        }
    }

    /// Snapshot the raw log for download, or `None` when there is nothing
    /// to export or the read failed.
    pub async fn export(&self, date: NaiveDate) -> Option<ExportBlob> {
        match self.manage.export(date).await {
            Ok(ExportOutcome::Ready(blob)) => Some(blob),
            Ok(ExportOutcome::NothingToExport) => {
                self.notifier.info("Nothing to export");
                None
            }
            Err(e) => {
                warn!("Failed to export {}: {}", self.manage.log_path(), e);
                self.notifier.error("Failed to export logs");
                None
            }
        }
    }

    /// Export and save the blob into `dir`. Returns the written file.
    pub async fn export_to(&self, dir: &Path, date: NaiveDate) -> Option<PathBuf> {
        let blob = self.export(date).await?;
        match save_blob(&blob, dir).await {
            Ok(path) => {
                self.notifier
                    .success(&format!("Exported to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                warn!("Failed to save {} into {}: {}", blob.file_name, dir.display(), e);
                self.notifier.error("Failed to save export");
                None
            }
        }
    }

    /// Hide the panel. The displayed text is kept for the next open.
    pub fn dismiss(&mut self) {
        self.open = false;
    }
}

async fn save_blob(blob: &ExportBlob, dir: &Path) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&blob.file_name);
    tokio::fs::write(&path, blob.content.as_bytes()).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlog_application::{CollectingNotifier, LogStorePort, MemoryLogStore, NoticeLevel};
    use promptlog_domain::LogPath;

    const RECORD: &str =
        r#"{"timestamp":"2024-05-01T12:30:00Z","characterName":"Seraphina","data":{"prompt":"hi"}}"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn viewer(store: MemoryLogStore) -> (LogViewer, Arc<CollectingNotifier>) {
        let notifier = Arc::new(CollectingNotifier::new());
        let manage = ManageLogUseCase::new(Arc::new(store), LogPath::default());
        (LogViewer::new(manage, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_initial_state_is_placeholder() {
        let (viewer, _) = viewer(MemoryLogStore::new());
        assert_eq!(viewer.displayed(), EMPTY_LOG_PLACEHOLDER);
        assert!(!viewer.is_open());
    }

    #[tokio::test]
    async fn test_open_renders_log() {
        let store = MemoryLogStore::new().with_contents(&LogPath::default(), &format!("{RECORD}\n"));
        let (mut viewer, notifier) = viewer(store);

        let text = viewer.open().await.to_string();
        assert!(text.starts_with("[2024-05-01T12:30:00.000Z] Seraphina"));
        assert!(viewer.is_open());
        assert!(notifier.notices().is_empty());

        viewer.dismiss();
        assert!(!viewer.is_open());
    }

    #[tokio::test]
    async fn test_open_failure_is_notified() {
        let (mut viewer, notifier) = viewer(MemoryLogStore::failing());
        assert_eq!(viewer.open().await, EMPTY_LOG_PLACEHOLDER);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
    }

    #[tokio::test]
    async fn test_clear_resets_to_placeholder() {
        let path = LogPath::default();
        let store = Arc::new(MemoryLogStore::new().with_contents(&path, &format!("{RECORD}\n")));
        let notifier = Arc::new(CollectingNotifier::new());
        let mut viewer = LogViewer::new(
            ManageLogUseCase::new(store.clone(), path.clone()),
            notifier.clone(),
        );

        viewer.open().await;
        assert_ne!(viewer.displayed(), EMPTY_LOG_PLACEHOLDER);

        assert!(viewer.clear().await);
        assert_eq!(viewer.displayed(), EMPTY_LOG_PLACEHOLDER);
        assert_eq!(store.read_all(&path).await.unwrap().unwrap_or_default(), "");
        assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
    }

    #[tokio::test]
    async fn test_clear_failure_is_notified() {
        let (mut viewer, notifier) = viewer(MemoryLogStore::failing());
        assert!(!viewer.clear().await);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
    }

    #[tokio::test]
    async fn test_export_empty_log_notifies() {
        let (viewer, notifier) = viewer(MemoryLogStore::new());
        assert!(viewer.export(date()).await.is_none());
        assert_eq!(notifier.levels(), vec![NoticeLevel::Info]);
    }

    #[tokio::test]
    async fn test_export_to_writes_raw_content() {
        let raw = format!("{RECORD}\nnot json\n");
        let store = MemoryLogStore::new().with_contents(&LogPath::default(), &raw);
        let (viewer, notifier) = viewer(store);
        let dir = tempfile::tempdir().unwrap();

        let path = viewer.export_to(dir.path(), date()).await.unwrap();
        assert_eq!(path, dir.path().join("prompt-log-2024-05-01.jsonl"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), raw);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
    }
}
