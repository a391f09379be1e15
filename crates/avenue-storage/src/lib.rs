//! # avenue-storage
//!
//! Blob store backends for Avenue: the local filesystem and a
//! process-local memory store.

pub mod providers;

pub use providers::{LocalBlobStore, MemoryBlobStore, from_config};
