//! Local filesystem log store.
//!
//! Logical paths resolve below a root directory. Appends go through a
//! single `O_APPEND` write of the whole buffer, which the OS applies
//! atomically relative to other appenders of the same file. A log whose
//! last line was left unterminated gets the missing newline in front of
//! the next record, in the same write.

use async_trait::async_trait;
use promptlog_application::ports::log_store::{LogStorePort, StoreError, line_terminated};
use promptlog_domain::LogPath;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Log store backed by files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalFileLogStore {
    root: PathBuf,
}

impl LocalFileLogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of `path`.
    pub fn resolve(&self, path: &LogPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    async fn ensure_parent(file: &Path) -> Result<(), StoreError> {
        if let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent.display(), e))?;
        }
        Ok(())
    }
}

/// Empty files and files ending in `\n` are on a line boundary.
fn ends_on_line_boundary(file: &mut std::fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[async_trait]
impl LogStorePort for LocalFileLogStore {
    async fn append(&self, path: &LogPath, text: &str) -> Result<(), StoreError> {
        let file = self.resolve(path);
        Self::ensure_parent(&file).await?;

        let mut bytes = line_terminated(text).into_owned().into_bytes();
        let target = file.clone();
        tokio::task::spawn_blocking(move || {
            let mut handle = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&target)?;
            if !ends_on_line_boundary(&mut handle)? {
                bytes.insert(0, b'\n');
            }
            handle.write_all(&bytes)?;
            handle.flush()
        })
        .await
        .map_err(|e| StoreError::Transport(format!("append task failed: {}", e)))?
        .map_err(|e| StoreError::io(file.display(), e))?;

        debug!("Appended to {}", file.display());
        Ok(())
    }

    async fn read_all(&self, path: &LogPath) -> Result<Option<String>, StoreError> {
        let file = self.resolve(path);
        match tokio::fs::read(&file).await {
            // Invalid UTF-8 must not make the whole log unreadable.
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(file.display(), e)),
        }
    }

    async fn clear(&self, path: &LogPath) -> Result<(), StoreError> {
        let file = self.resolve(path);
        Self::ensure_parent(&file).await?;
        tokio::fs::write(&file, b"")
            .await
            .map_err(|e| StoreError::io(file.display(), e))
    }

    fn transport(&self) -> &'static str {
        "local"
    }
}
