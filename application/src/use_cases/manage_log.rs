//! Log maintenance use case: read, clear, and export the raw log.
//!
//! These operations return errors to the caller; the viewer decides how to
//! report them to the user.

use crate::ports::log_store::{LogStorePort, StoreError};
use chrono::NaiveDate;
use promptlog_domain::{ExportBlob, LogPath};
use std::sync::Arc;
use tracing::debug;

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The log is empty or absent; no download should be produced.
    NothingToExport,
    Ready(ExportBlob),
}

#[derive(Clone)]
pub struct ManageLogUseCase {
    store: Arc<dyn LogStorePort>,
    log_path: LogPath,
}

impl ManageLogUseCase {
    pub fn new(store: Arc<dyn LogStorePort>, log_path: LogPath) -> Self {
        Self { store, log_path }
    }

    pub fn log_path(&self) -> &LogPath {
        &self.log_path
    }

    /// Raw log text; an absent log reads as empty.
    pub async fn read_raw(&self) -> Result<String, StoreError> {
        let raw = self.store.read_all(&self.log_path).await?;
        if raw.is_none() {
            debug!("{} does not exist yet", self.log_path);
        }
        Ok(raw.unwrap_or_default())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear(&self.log_path).await?;
        debug!("Cleared {} via {}", self.log_path, self.store.transport());
        Ok(())
    }

    /// Snapshot the raw log for download, named after `date`.
    pub async fn export(&self, date: NaiveDate) -> Result<ExportOutcome, StoreError> {
        let raw = self.read_raw().await?;
        Ok(match ExportBlob::from_raw(&raw, date) {
            Some(blob) => ExportOutcome::Ready(blob),
            None => ExportOutcome::NothingToExport,
        })
    }
}
