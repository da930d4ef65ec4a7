//! Port for the append-only log store.
//!
//! Defines the [`LogStorePort`] trait that every storage transport implements.
//! Callers only see the logical contract (append, read everything, clear);
//! whether the bytes go to a local file or through a remote file service is
//! decided once, when the store is constructed.
//!
//! Append atomicity is the transport's job: an implementation must hand the
//! whole buffer to the underlying storage in one append so that concurrent
//! writers never interleave partial lines.

use async_trait::async_trait;
use promptlog_domain::LogPath;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors raised by a storage transport.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Storage transport for the log.
#[async_trait]
pub trait LogStorePort: Send + Sync {
    /// Append `text` to the end of the log, creating it (and any parent
    /// directory) when missing. The log always ends in a newline afterwards.
    async fn append(&self, path: &LogPath, text: &str) -> Result<(), StoreError>;

    /// Full current contents, or `None` when the log does not exist yet.
    async fn read_all(&self, path: &LogPath) -> Result<Option<String>, StoreError>;

    /// Truncate the log to empty. The log still exists afterwards.
    async fn clear(&self, path: &LogPath) -> Result<(), StoreError>;

    /// Short transport name for diagnostics.
    fn transport(&self) -> &'static str;
}

/// Terminate `text` with a newline unless it already ends in one.
pub fn line_terminated(text: &str) -> Cow<'_, str> {
    if text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{text}\n"))
    }
}

/// In-memory store for tests and dry runs.
///
/// Counts every operation so callers can assert that no I/O happened.
#[derive(Default)]
pub struct MemoryLogStore {
    logs: Mutex<HashMap<LogPath, String>>,
    operations: AtomicUsize,
    failing: bool,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with a transport error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Pre-populate a log.
    pub fn with_contents(self, path: &LogPath, contents: impl Into<String>) -> Self {
        if let Ok(mut logs) = self.logs.lock() {
            logs.insert(path.clone(), contents.into());
        }
        self
    }

    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    pub fn contents(&self, path: &LogPath) -> Option<String> {
        self.logs.lock().ok()?.get(path).cloned()
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, HashMap<LogPath, String>>, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(StoreError::Transport("memory store configured to fail".to_string()));
        }
        self.logs
            .lock()
            .map_err(|_| StoreError::Transport("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl LogStorePort for MemoryLogStore {
    async fn append(&self, path: &LogPath, text: &str) -> Result<(), StoreError> {
        let mut logs = self.begin()?;
        logs.entry(path.clone())
            .or_default()
            .push_str(&line_terminated(text));
        Ok(())
    }

    async fn read_all(&self, path: &LogPath) -> Result<Option<String>, StoreError> {
        Ok(self.begin()?.get(path).cloned())
    }

    async fn clear(&self, path: &LogPath) -> Result<(), StoreError> {
        self.begin()?.insert(path.clone(), String::new());
        Ok(())
    }

    fn transport(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_terminated() {
        assert_eq!(line_terminated("a"), "a\n");
        assert!(matches!(line_terminated("a\n"), Cow::Borrowed("a\n")));
        assert_eq!(line_terminated(""), "\n");
    }

    #[tokio::test]
    async fn test_memory_store_append_read_clear() {
        let store = MemoryLogStore::new();
        let path = LogPath::default();

        assert_eq!(store.read_all(&path).await.unwrap(), None);
        store.append(&path, "a").await.unwrap();
        store.append(&path, "b\n").await.unwrap();
        assert_eq!(store.read_all(&path).await.unwrap().as_deref(), Some("a\nb\n"));

        store.clear(&path).await.unwrap();
        assert_eq!(store.read_all(&path).await.unwrap().as_deref(), Some(""));
        assert_eq!(store.operations(), 6);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryLogStore::failing();
        let err = store.append(&LogPath::default(), "x").await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
        assert_eq!(store.operations(), 1);
    }
}
