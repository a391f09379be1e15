//! Process-local blob store.
//!
//! Blobs live in a [`DashMap`] and become visible once their writer is
//! shut down. An optional capacity bounds the total committed plus
//! in-flight bytes; a write past it fails with `StorageFull`.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{DashMap, DashSet};
use tokio::io::AsyncWrite;
use tracing::debug;

use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_core::traits::{BlobReader, BlobStore, BlobWriter};
use avenue_core::types::{BlobPath, UserId};

#[derive(Debug)]
struct Inner {
    namespaces: DashSet<UserId>,
    blobs: DashMap<BlobPath, Bytes>,
    capacity: Option<u64>,
    used: AtomicU64,
}

impl Inner {
    fn reserve(&self, len: u64) -> io::Result<()> {
        let capacity = self.capacity;
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| match capacity {
                Some(cap) if used + len > cap => None,
                _ => Some(used + len),
            })
            .map(|_| ())
            .map_err(|_| io::Error::new(io::ErrorKind::StorageFull, "memory blob store is full"))
    }

    fn release(&self, len: u64) {
        self.used.fetch_sub(len, Ordering::SeqCst);
    }
}

/// Blob store holding everything in memory.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    inner: Arc<Inner>,
}

impl MemoryBlobStore {
    /// Create an empty store, optionally bounded to `capacity` bytes.
    pub fn new(capacity: Option<u64>) -> Self {
        Self {
            inner: Arc::new(Inner {
                namespaces: DashSet::new(),
                blobs: DashMap::new(),
                capacity,
                used: AtomicU64::new(0),
            }),
        }
    }

    /// Number of committed blobs.
    pub fn blob_count(&self) -> usize {
        self.inner.blobs.len()
    }

    /// Bytes held by committed and in-flight blobs.
    pub fn used_bytes(&self) -> u64 {
        self.inner.used.load(Ordering::SeqCst)
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Buffers written bytes and publishes them on shutdown.
struct MemoryBlobWriter {
    inner: Arc<Inner>,
    path: BlobPath,
    buf: Vec<u8>,
    committed: bool,
}

impl AsyncWrite for MemoryBlobWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.committed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "blob writer already shut down",
            )));
        }
        this.inner.reserve(data.len() as u64)?;
        this.buf.extend_from_slice(data);
        Poll::Ready(Ok(data.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if !this.committed {
            let bytes = Bytes::from(std::mem::take(&mut this.buf));
            if let Some(old) = this.inner.blobs.insert(this.path, bytes) {
                this.inner.release(old.len() as u64);
            }
            this.committed = true;
        }
        Poll::Ready(Ok(()))
    }
}

impl Drop for MemoryBlobWriter {
    fn drop(&mut self) {
        if !self.committed {
            self.inner.release(self.buf.len() as u64);
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn ensure_namespace(&self, owner: UserId) -> AppResult<()> {
        self.inner.namespaces.insert(owner);
        Ok(())
    }

    async fn create(&self, path: &BlobPath) -> AppResult<BlobWriter> {
        if !self.inner.namespaces.contains(&path.owner()) {
            return Err(AppError::blob_write(format!(
                "Failed to create blob: {path}: namespace {} does not exist",
                path.namespace()
            )));
        }
        debug!(%path, "Created blob");
        Ok(Box::pin(MemoryBlobWriter {
            inner: self.inner.clone(),
            path: *path,
            buf: Vec::new(),
            committed: false,
        }))
    }

    async fn open(&self, path: &BlobPath) -> AppResult<BlobReader> {
        let bytes = self
            .inner
            .blobs
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))?;
        Ok(Box::pin(io::Cursor::new(bytes)))
    }

    async fn remove(&self, path: &BlobPath) -> AppResult<()> {
        let (_, bytes) = self
            .inner
            .blobs
            .remove(path)
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))?;
        self.inner.release(bytes.len() as u64);
        debug!(%path, "Removed blob");
        Ok(())
    }

    async fn exists(&self, path: &BlobPath) -> AppResult<bool> {
        Ok(self.inner.blobs.contains_key(path))
    }
}
