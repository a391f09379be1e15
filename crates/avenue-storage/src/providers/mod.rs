//! Blob store implementations.

pub mod local;
pub mod memory;

use std::sync::Arc;

use tracing::info;

use avenue_core::config::{BlobBackend, StorageConfig};
use avenue_core::result::AppResult;
use avenue_core::traits::BlobStore;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

/// Build the configured blob store.
pub async fn from_config(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.backend {
        BlobBackend::Local => Arc::new(LocalBlobStore::new(&config.root_path).await?),
        BlobBackend::Memory => Arc::new(MemoryBlobStore::new(config.memory_capacity_bytes)),
    };
    info!(backend = store.backend(), "Blob store ready");
    Ok(store)
}
