//! Log store transports.
//!
//! Both implement [`LogStorePort`] and share the on-disk line format; which
//! one is used is decided once from the `[store]` configuration.

mod local_file;
#[cfg(feature = "remote")]
mod remote;

pub use local_file::LocalFileLogStore;
#[cfg(feature = "remote")]
pub use remote::{RemoteFileLogStore, TOKEN_HEADER};

use crate::config::{FileStoreConfig, StoreTransport};
use promptlog_application::ports::log_store::{LogStorePort, StoreError};
use std::sync::Arc;
use tracing::info;

/// Construct the configured transport.
pub fn build_log_store(config: &FileStoreConfig) -> Result<Arc<dyn LogStorePort>, StoreError> {
    match config.transport {
        StoreTransport::Local => {
            let store = LocalFileLogStore::new(config.root_dir());
            info!("Using local log store under {}", store.root().display());
            Ok(Arc::new(store))
        }
        #[cfg(feature = "remote")]
        StoreTransport::Remote => {
            let remote = &config.remote;
            let store = RemoteFileLogStore::new(
                &remote.base_url,
                remote.resolve_token().unwrap_or_default(),
                remote.timeout(),
            )?;
            info!("Using remote log store at {}", store.base_url());
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "remote"))]
        StoreTransport::Remote => Err(StoreError::Transport(
            "remote transport requires the `remote` feature".to_string(),
        )),
    }
}
