//! The Hierarchy Manager: one entry point over the file and folder services.

use std::sync::Arc;

use avenue_core::result::AppResult;
use avenue_core::traits::BlobStore;
use avenue_core::types::{FileId, FolderId, FolderRef};
use avenue_database::Catalog;
use avenue_entity::file::File;
use avenue_entity::folder::{Folder, FolderContents};

use crate::context::RequestContext;
use crate::file::{Download, DownloadService, FileService, UploadRequest, UploadService};
use crate::folder::FolderService;

/// Keeps the catalog and the blob store consistent for every file and
/// folder operation.
#[derive(Debug, Clone)]
pub struct HierarchyManager {
    uploads: UploadService,
    downloads: DownloadService,
    files: FileService,
    folders: FolderService,
}

impl HierarchyManager {
    /// Wire the services over a catalog and an injected blob store.
    pub fn new(catalog: &Catalog, blobs: Arc<dyn BlobStore>, chunk_size: usize) -> Self {
        Self {
            uploads: UploadService::new(catalog.files.clone(), blobs.clone()),
            downloads: DownloadService::new(catalog.files.clone(), blobs.clone(), chunk_size),
            files: FileService::new(catalog.files.clone(), blobs),
            folders: FolderService::new(catalog.folders.clone(), catalog.files.clone()),
        }
    }

    /// Store a new file.
    pub async fn upload(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        self.uploads.upload(ctx, req).await
    }

    /// Metadata plus a chunked byte stream.
    pub async fn download(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<Download> {
        self.downloads.download(ctx, file_id).await
    }

    /// Metadata only.
    pub async fn stat(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        self.files.stat(ctx, file_id).await
    }

    /// Remove a file's bytes and row.
    pub async fn delete(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        self.files.delete(ctx, file_id).await
    }

    /// Every file the caller owns.
    pub async fn list_files(&self, ctx: &RequestContext) -> AppResult<Vec<File>> {
        self.files.list_files(ctx).await
    }

    /// Create a folder, validating the parent.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: Option<&str>,
    ) -> AppResult<Folder> {
        self.folders.create_folder(ctx, name, parent).await
    }

    /// Immediate children of a folder or the top level.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent: FolderRef,
    ) -> AppResult<FolderContents> {
        self.folders.list_children(ctx, parent).await
    }

    /// Delete an empty folder.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        self.folders.delete_folder(ctx, folder_id).await
    }
}
