//! File lookup, listing, and two-phase delete.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::traits::BlobStore;
use avenue_core::types::FileId;
use avenue_database::FileCatalog;
use avenue_entity::file::File;

use crate::context::RequestContext;

/// File metadata and deletion.
#[derive(Debug, Clone)]
pub struct FileService {
    files: Arc<dyn FileCatalog>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(files: Arc<dyn FileCatalog>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// A file's metadata, without touching the blob store.
    pub async fn stat(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        self.files
            .find_by_id(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// All of the caller's files, in insertion order.
    pub async fn list_files(&self, ctx: &RequestContext) -> AppResult<Vec<File>> {
        self.files.find_by_owner(ctx.user_id).await
    }

    /// Remove a file's bytes, then its row.
    ///
    /// If the bytes cannot be removed the row is left alone. If the row
    /// delete fails after the bytes are gone, the dangling row is logged
    /// and `CatalogWrite` is returned.
    pub async fn delete(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let file = self.stat(ctx, file_id).await?;
        let path = file.blob_path();

        match self.blobs.remove(&path).await {
            Ok(()) => {}
            Err(e) if e.is(ErrorKind::NotFound) => {
                warn!(file_id = %file.id, %path, "Blob already gone; deleting catalog row");
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::StorageIo,
                    format!("Failed to remove blob for file {file_id}"),
                    e,
                ));
            }
        }

        match self.files.delete(file.id).await {
            Ok(true) => {}
            Ok(false) => {
                // Lost a race with another delete of the same id.
                debug!(file_id = %file.id, "Row vanished during delete");
                return Err(AppError::not_found(format!("File {file_id} not found")));
            }
            Err(e) => {
                error!(
                    file_id = %file.id,
                    %path,
                    error = %e,
                    "Blob removed but catalog row remains"
                );
                return Err(AppError::with_source(
                    ErrorKind::CatalogWrite,
                    format!("Failed to delete row for file {file_id}"),
                    e,
                ));
            }
        }

        info!(user_id = %ctx.user_id, file_id = %file.id, "File deleted");
        Ok(())
    }
}
