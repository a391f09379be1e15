//! Fault-injecting wrappers for exercising compensation paths.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_core::traits::{BlobReader, BlobStore, BlobWriter, ByteSource};
use avenue_core::types::{BlobPath, FileId, FolderRef, UserId};
use avenue_database::{FileCatalog, MemoryCatalog};
use avenue_entity::file::{CreateFile, File};
use avenue_storage::MemoryBlobStore;

/// A byte source over an owned copy of `bytes`.
pub fn source(bytes: &[u8]) -> ByteSource {
    Box::pin(std::io::Cursor::new(bytes.to_vec()))
}

/// A memory blob store whose namespace and remove calls can be made to fail.
#[derive(Debug)]
pub struct FlakyBlobStore {
    inner: MemoryBlobStore,
    fail_namespace: AtomicBool,
    fail_remove: AtomicBool,
}

impl FlakyBlobStore {
    pub fn new(inner: MemoryBlobStore) -> Self {
        Self {
            inner,
            fail_namespace: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &MemoryBlobStore {
        &self.inner
    }

    pub fn fail_namespace(&self, fail: bool) {
        self.fail_namespace.store(fail, Ordering::SeqCst);
    }

    pub fn fail_remove(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    fn backend(&self) -> &str {
        "flaky"
    }

    async fn ensure_namespace(&self, owner: UserId) -> AppResult<()> {
        if self.fail_namespace.load(Ordering::SeqCst) {
            return Err(AppError::namespace(format!("Injected failure for /{owner}")));
        }
        self.inner.ensure_namespace(owner).await
    }

    async fn create(&self, path: &BlobPath) -> AppResult<BlobWriter> {
        self.inner.create(path).await
    }

    async fn open(&self, path: &BlobPath) -> AppResult<BlobReader> {
        self.inner.open(path).await
    }

    async fn remove(&self, path: &BlobPath) -> AppResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AppError::storage_io(format!("Injected failure removing {path}")));
        }
        self.inner.remove(path).await
    }

    async fn exists(&self, path: &BlobPath) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// A memory blob store whose readers fail after `fail_after` bytes.
#[derive(Debug)]
pub struct FailingReadBlobStore {
    inner: MemoryBlobStore,
    fail_after: usize,
}

impl FailingReadBlobStore {
    pub fn new(inner: MemoryBlobStore, fail_after: usize) -> Self {
        Self { inner, fail_after }
    }
}

/// Reader that errors on every poll.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("injected read failure")))
    }
}

#[async_trait]
impl BlobStore for FailingReadBlobStore {
    fn backend(&self) -> &str {
        "failing-read"
    }

    async fn ensure_namespace(&self, owner: UserId) -> AppResult<()> {
        self.inner.ensure_namespace(owner).await
    }

    async fn create(&self, path: &BlobPath) -> AppResult<BlobWriter> {
        self.inner.create(path).await
    }

    async fn open(&self, path: &BlobPath) -> AppResult<BlobReader> {
        let mut bytes = Vec::new();
        self.inner.open(path).await?.read_to_end(&mut bytes).await?;
        bytes.truncate(self.fail_after);
        Ok(Box::pin(std::io::Cursor::new(bytes).chain(BrokenReader)))
    }

    async fn remove(&self, path: &BlobPath) -> AppResult<()> {
        self.inner.remove(path).await
    }

    async fn exists(&self, path: &BlobPath) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// A memory file catalog whose size update and delete can be made to fail.
#[derive(Debug)]
pub struct FlakyFileCatalog {
    inner: Arc<MemoryCatalog>,
    fail_update_size: AtomicBool,
    fail_delete: AtomicBool,
}

impl FlakyFileCatalog {
    pub fn new(inner: Arc<MemoryCatalog>) -> Self {
        Self {
            inner,
            fail_update_size: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn fail_update_size(&self, fail: bool) {
        self.fail_update_size.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileCatalog for FlakyFileCatalog {
    async fn insert(&self, data: &CreateFile) -> AppResult<File> {
        FileCatalog::insert(self.inner.as_ref(), data).await
    }

    async fn find_by_id(&self, owner: UserId, id: FileId) -> AppResult<Option<File>> {
        FileCatalog::find_by_id(self.inner.as_ref(), owner, id).await
    }

    async fn find_by_owner(&self, owner: UserId) -> AppResult<Vec<File>> {
        self.inner.find_by_owner(owner).await
    }

    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<File>> {
        FileCatalog::find_by_parent(self.inner.as_ref(), owner, parent).await
    }

    async fn update_size(&self, id: FileId, size_bytes: i64) -> AppResult<()> {
        if self.fail_update_size.load(Ordering::SeqCst) {
            return Err(AppError::catalog_write("Injected failure updating size"));
        }
        self.inner.update_size(id, size_bytes).await
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::catalog_write("Injected failure deleting row"));
        }
        FileCatalog::delete(self.inner.as_ref(), id).await
    }
}
