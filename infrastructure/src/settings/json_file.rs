//! Capture settings persisted in a shared JSON settings file.
//!
//! The file is a JSON object keyed by extension identity; this store owns
//! only the [`SETTINGS_KEY`] entry and preserves everything else.
//!
//! Writes are debounced: [`commit_soon`](SettingsPersistencePort::commit_soon)
//! records the pending value and arms a timer; a newer commit supersedes any
//! timer still waiting, so a burst of toggles results in a single write.

use async_trait::async_trait;
use promptlog_application::ports::settings_persistence::{SettingsError, SettingsPersistencePort};
use promptlog_domain::CaptureSettings;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Key of this extension's entry in the settings file.
pub const SETTINGS_KEY: &str = "promptlog";

pub struct JsonSettingsFile {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    debounce: Duration,
    pending: Mutex<Option<CaptureSettings>>,
    generation: AtomicU64,
    write_lock: tokio::sync::Mutex<()>,
    writes: AtomicUsize,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                debounce,
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
                write_lock: tokio::sync::Mutex::new(()),
                writes: AtomicUsize::new(0),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Number of completed writes.
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }
}

impl Inner {
    async fn read_document(&self) -> Result<Option<Map<String, Value>>, SettingsError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(SettingsError::Malformed(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(SettingsError::Malformed(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_pending(&self) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock().await;

        let Some(settings) = self.pending.lock().ok().and_then(|mut p| p.take()) else {
            return Ok(());
        };

        let mut document = match self.read_document().await {
            Ok(document) => document.unwrap_or_default(),
            Err(SettingsError::Malformed(reason)) => {
                warn!("Replacing unreadable settings file: {}", reason);
                Map::new()
            }
            Err(e) => return Err(e),
        };
        let value = serde_json::to_value(settings)
            .map_err(|e| SettingsError::Malformed(e.to_string()))?;
        document.insert(SETTINGS_KEY.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|e| SettingsError::Malformed(e.to_string()))?;
        tokio::fs::write(&self.path, body).await?;

        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!("Saved capture settings to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl SettingsPersistencePort for JsonSettingsFile {
    async fn load(&self) -> Result<Option<CaptureSettings>, SettingsError> {
        let Some(document) = self.inner.read_document().await? else {
            return Ok(None);
        };
        match document.get(SETTINGS_KEY) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| SettingsError::Malformed(format!("{}: {}", SETTINGS_KEY, e))),
        }
    }

    fn commit_soon(&self, settings: CaptureSettings) {
        if let Ok(mut pending) = self.inner.pending.lock() {
            *pending = Some(settings);
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime for debounced save; value stays pending until flush");
            return;
        };
        let inner = self.inner.clone();
        runtime.spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            if let Err(e) = inner.write_pending().await {
                warn!("Could not save capture settings: {}", e);
            }
        });
    }

    async fn flush(&self) -> Result<(), SettingsError> {
        self.inner.write_pending().await
    }
}
