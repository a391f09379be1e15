//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use avenue_core::types::{BlobPath, FileId, FolderId, FolderRef, UserId};

/// Sentinel size recorded while a file's bytes are still being written.
pub const SIZE_PENDING: i64 = 0;

/// A file's catalog row. Its bytes live in the blob store at
/// [`File::blob_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// Display name, without extension.
    pub name: String,
    /// Extension, without the leading dot.
    pub extension: String,
    /// Size in bytes; [`SIZE_PENDING`] until the upload commits.
    pub size_bytes: i64,
    /// Parent folder (None for top level).
    pub parent_id: Option<FolderId>,
    /// The owning user.
    pub owner_id: UserId,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl File {
    /// Where this file's bytes are stored.
    pub fn blob_path(&self) -> BlobPath {
        BlobPath::for_file(self.owner_id, self.id)
    }

    /// The folder reference this file is listed under.
    pub fn parent(&self) -> FolderRef {
        FolderRef::from(self.parent_id)
    }

    /// `name.extension`, or just the name when there is no extension.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }
}

/// Data required to reserve a new file row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Pre-generated identifier.
    pub id: FileId,
    /// Display name.
    pub name: String,
    /// Extension.
    pub extension: String,
    /// Parent folder.
    pub parent_id: Option<FolderId>,
    /// The owning user.
    pub owner_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(extension: &str) -> File {
        File {
            id: FileId::generate(),
            name: "report".into(),
            extension: extension.into(),
            size_bytes: SIZE_PENDING,
            parent_id: None,
            owner_id: UserId(3),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file("pdf").file_name(), "report.pdf");
        assert_eq!(file("").file_name(), "report");
    }

    #[test]
    fn test_blob_path_uses_owner() {
        let f = file("pdf");
        assert_eq!(f.blob_path().to_string(), format!("/3/{}", f.id));
        assert!(f.parent().is_root());
    }
}
