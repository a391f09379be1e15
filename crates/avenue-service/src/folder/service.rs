//! Folder creation, one-level listing, and deletion of empty folders.

use std::sync::Arc;

use tracing::info;

use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_core::types::{FolderId, FolderRef};
use avenue_database::{FileCatalog, FolderCatalog};
use avenue_entity::folder::{CreateFolder, Folder, FolderContents};

use crate::context::RequestContext;

const MAX_NAME_LENGTH: usize = 255;

/// Folder tree operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderCatalog>,
    files: Arc<dyn FileCatalog>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folders: Arc<dyn FolderCatalog>, files: Arc<dyn FileCatalog>) -> Self {
        Self { folders, files }
    }

    /// Interpret a textual listing reference; anything unrecognized is `NotFound`.
    pub fn listing_ref(raw: &str) -> AppResult<FolderRef> {
        FolderRef::parse_listing(raw).map_err(|e| AppError::not_found(e.to_string()))
    }

    /// Create a folder under `parent` (absent or empty for top level).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: Option<&str>,
    ) -> AppResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Folder name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        let parent = FolderRef::parse_parent(parent)
            .map_err(|e| AppError::invalid_parent(format!("Parent folder must exist: {e}")))?;

        if let FolderRef::Folder(parent_id) = parent {
            if self
                .folders
                .find_by_id(ctx.user_id, parent_id)
                .await?
                .is_none()
            {
                return Err(AppError::invalid_parent(format!(
                    "Parent folder {parent_id} does not exist"
                )));
            }
        }

        // The catalog's parent constraint rejects a parent deleted since the check.
        let folder = self
            .folders
            .insert(&CreateFolder {
                id: FolderId::generate(),
                name: name.to_string(),
                parent_id: parent.folder_id(),
                owner_id: ctx.user_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent = %parent,
            "Folder created"
        );
        Ok(folder)
    }

    /// Immediate child folders and files of `parent`.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent: FolderRef,
    ) -> AppResult<FolderContents> {
        if let FolderRef::Folder(id) = parent {
            self.folders
                .find_by_id(ctx.user_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        }

        Ok(FolderContents {
            folders: self.folders.find_by_parent(ctx.user_id, parent).await?,
            files: self.files.find_by_parent(ctx.user_id, parent).await?,
        })
    }

    /// Delete an empty folder. Fails with `Conflict` while it has children.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        if !self.folders.delete(ctx.user_id, folder_id).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder deleted");
        Ok(())
    }
}
