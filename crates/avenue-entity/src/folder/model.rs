//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use avenue_core::types::{FolderId, FolderRef, UserId};

/// A folder in a user's forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for top-level folders).
    pub parent_id: Option<FolderId>,
    /// The folder owner.
    pub owner_id: UserId,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a top-level folder.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The folder reference this folder is listed under.
    pub fn parent(&self) -> FolderRef {
        FolderRef::from(self.parent_id)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Pre-generated identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder (None for top level).
    pub parent_id: Option<FolderId>,
    /// The folder owner.
    pub owner_id: UserId,
}
