//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Which blob store implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// Files under `root_path` on local disk.
    #[default]
    Local,
    /// Process-local buffers; contents are lost on exit.
    Memory,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob store implementation.
    #[serde(default)]
    pub backend: BlobBackend,
    /// Root directory of the local blob store.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Size of the chunks emitted by streaming downloads.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
    /// Capacity limit of the memory blob store (unlimited when absent).
    #[serde(default)]
    pub memory_capacity_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::default(),
            root_path: default_root_path(),
            chunk_size_bytes: default_chunk_size(),
            memory_capacity_bytes: None,
        }
    }
}

fn default_root_path() -> String {
    "./data/blobs".to_string()
}

fn default_chunk_size() -> usize {
    4096 // 4 KiB
}
