//! File upload as a saga over the catalog and the blob store.
//!
//! ```text
//!   insert row ──► Reserved ──► ensure namespace, copy bytes ──► BytesWritten
//!        │             │                                            │
//!        ▼             ▼ (delete row, remove partial blob)          ▼ update size
//!      error       RolledBack ◄──────────────────────────────── Committed
//!                                 (size update failed)
//! ```
//!
//! The row is inserted before any byte is written, so a reader can never
//! see a row whose blob was never attempted without the saga also being
//! in flight. Each compensation runs once; its own failure is logged and
//! the original error is returned.

use std::fmt;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::traits::{BlobStore, ByteSource};
use avenue_core::types::{FileId, FolderRef};
use avenue_database::FileCatalog;
use avenue_entity::file::{CreateFile, File};

use crate::context::RequestContext;

/// A file to upload.
pub struct UploadRequest {
    /// Display name.
    pub name: String,
    /// Extension, without the leading dot.
    pub extension: String,
    /// Raw parent folder id; absent or empty means top level.
    pub parent: Option<String>,
    /// Where the bytes come from.
    pub source: ByteSource,
}

impl UploadRequest {
    /// A top-level upload.
    pub fn new(name: impl Into<String>, extension: impl Into<String>, source: ByteSource) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            parent: None,
            source,
        }
    }

    /// Place the file under `parent`.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Where an upload stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// The catalog row exists with a pending size.
    Reserved,
    /// The blob holds every byte.
    BytesWritten,
    /// The row carries the final size.
    Committed,
    /// The attempt was undone.
    RolledBack,
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved => write!(f, "reserved"),
            Self::BytesWritten => write!(f, "bytes_written"),
            Self::Committed => write!(f, "committed"),
            Self::RolledBack => write!(f, "rolled_back"),
        }
    }
}

/// One in-flight upload.
struct UploadSaga<'a> {
    files: &'a dyn FileCatalog,
    blobs: &'a dyn BlobStore,
    file: File,
    state: UploadState,
    blob_created: bool,
}

impl<'a> UploadSaga<'a> {
    /// Insert the row that reserves the file id.
    async fn reserve(
        files: &'a dyn FileCatalog,
        blobs: &'a dyn BlobStore,
        data: &CreateFile,
    ) -> AppResult<Self> {
        let file = files.insert(data).await?;
        debug!(file_id = %file.id, "Upload reserved");
        Ok(Self {
            files,
            blobs,
            file,
            state: UploadState::Reserved,
            blob_created: false,
        })
    }

    fn advance(&mut self, next: UploadState) {
        debug!(file_id = %self.file.id, from = %self.state, to = %next, "Upload state change");
        self.state = next;
    }

    /// Copy the source into the blob. Returns the byte count.
    async fn write_bytes(&mut self, mut source: ByteSource) -> AppResult<u64> {
        let path = self.file.blob_path();
        self.blobs.ensure_namespace(self.file.owner_id).await?;

        let mut writer = self.blobs.create(&path).await?;
        self.blob_created = true;

        let written = tokio::io::copy(&mut source, &mut writer)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::BlobWrite, format!("Failed to write {path}"), e)
            })?;
        writer.shutdown().await.map_err(|e| {
            AppError::with_source(ErrorKind::BlobWrite, format!("Failed to finish {path}"), e)
        })?;

        self.advance(UploadState::BytesWritten);
        Ok(written)
    }

    /// Record the final size on the row.
    async fn commit(&mut self, written: u64) -> AppResult<()> {
        let size = i64::try_from(written)
            .map_err(|_| AppError::catalog_write(format!("File size {written} out of range")))?;
        self.files.update_size(self.file.id, size).await?;
        self.file.size_bytes = size;
        self.advance(UploadState::Committed);
        Ok(())
    }

    /// Undo whatever has been done: the row first, then any blob bytes.
    async fn roll_back(&mut self, cause: &AppError) {
        let id = self.file.id;
        match self.files.delete(id).await {
            Ok(true) => {}
            Ok(false) => warn!(file_id = %id, "Upload rollback found no row to delete"),
            Err(e) => error!(
                file_id = %id,
                cause = %cause,
                error = %e,
                "Upload rollback failed to delete the catalog row"
            ),
        }

        if self.blob_created {
            let path = self.file.blob_path();
            match self.blobs.remove(&path).await {
                Ok(()) => {}
                Err(e) if e.is(ErrorKind::NotFound) => {}
                Err(e) => warn!(%path, error = %e, "Upload rollback left blob bytes behind"),
            }
        }

        self.advance(UploadState::RolledBack);
    }

    /// Run the remaining steps, rolling back on the first failure.
    async fn run(mut self, source: ByteSource) -> AppResult<File> {
        let outcome = match self.write_bytes(source).await {
            Ok(written) => self.commit(written).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => Ok(self.file),
            Err(e) => {
                self.roll_back(&e).await;
                Err(e)
            }
        }
    }
}

/// Stores new files.
#[derive(Debug, Clone)]
pub struct UploadService {
    files: Arc<dyn FileCatalog>,
    blobs: Arc<dyn BlobStore>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(files: Arc<dyn FileCatalog>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// Upload a file for the caller.
    ///
    /// Either both the row (with its final size) and the bytes exist
    /// afterwards, or the row has been removed again.
    pub async fn upload(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        let parent = FolderRef::parse_parent(req.parent.as_deref())
            .map_err(|e| AppError::catalog_write(format!("File parent rejected: {e}")))?;

        let data = CreateFile {
            id: FileId::generate(),
            name: req.name,
            extension: req.extension,
            parent_id: parent.folder_id(),
            owner_id: ctx.user_id,
        };

        let saga = UploadSaga::reserve(self.files.as_ref(), self.blobs.as_ref(), &data).await?;
        let file = saga.run(req.source).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            parent = %file.parent(),
            size = file.size_bytes,
            "Upload committed"
        );
        Ok(file)
    }
}
