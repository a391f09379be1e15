//! Blob store trait for pluggable byte storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::result::AppResult;
use crate::types::{BlobPath, UserId};

/// A writable handle onto a newly created blob.
///
/// Bytes become durable (and visible to `open`) once `shutdown` completes.
pub type BlobWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// A readable handle onto an existing blob.
pub type BlobReader = Pin<Box<dyn AsyncRead + Send>>;

/// A caller-supplied byte source for uploads.
pub type ByteSource = Pin<Box<dyn AsyncRead + Send>>;

/// A stream of bounded-size chunks read from a blob.
pub type ByteStream = Pin<Box<dyn Stream<Item = AppResult<Bytes>> + Send>>;

/// Byte-addressable storage for raw file contents, namespaced per user.
///
/// Implementations exist for the local filesystem and for memory. The
/// trait carries no business logic: the Hierarchy Manager decides the
/// ordering of blob and catalog operations.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name (e.g. "local", "memory").
    fn backend(&self) -> &str;

    /// Ensure the per-user namespace exists, creating it if absent.
    ///
    /// Fails with `ErrorKind::Namespace`.
    async fn ensure_namespace(&self, owner: UserId) -> AppResult<()>;

    /// Create (or truncate) the blob at `path` and return a writer.
    ///
    /// Fails with `ErrorKind::BlobWrite`.
    async fn create(&self, path: &BlobPath) -> AppResult<BlobWriter>;

    /// Open the blob at `path` for reading.
    ///
    /// Fails with `ErrorKind::NotFound` when absent and
    /// `ErrorKind::StorageIo` on any other failure.
    async fn open(&self, path: &BlobPath) -> AppResult<BlobReader>;

    /// Remove the blob at `path`.
    ///
    /// Fails with `ErrorKind::NotFound` when absent and
    /// `ErrorKind::StorageIo` on any other failure.
    async fn remove(&self, path: &BlobPath) -> AppResult<()>;

    /// Whether a blob exists at `path`.
    async fn exists(&self, path: &BlobPath) -> AppResult<bool>;
}
