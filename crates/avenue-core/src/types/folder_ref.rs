//! Parent / listing references into the folder forest.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::FolderId;

/// Reserved textual sentinel that names the top level of a user's forest.
///
/// Distinct from the empty string, which only means "no parent" when
/// creating a folder or uploading a file.
pub const ROOT_SENTINEL: &str = "-1";

/// Either the top level of a user's forest or a specific folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum FolderRef {
    /// The top level (rows stored with no parent).
    Root,
    /// A concrete folder.
    Folder(FolderId),
}

/// Failure to interpret a textual folder reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a folder reference")]
pub struct InvalidFolderRef(pub String);

impl FolderRef {
    /// Parse a listing reference: the root sentinel or a folder id.
    pub fn parse_listing(raw: &str) -> Result<Self, InvalidFolderRef> {
        let raw = raw.trim();
        if raw == ROOT_SENTINEL {
            return Ok(Self::Root);
        }
        raw.parse::<FolderId>()
            .map(Self::Folder)
            .map_err(|_| InvalidFolderRef(raw.to_string()))
    }

    /// Parse an optional parent given at creation time.
    ///
    /// An absent or empty parent (and the root sentinel) means top level.
    pub fn parse_parent(raw: Option<&str>) -> Result<Self, InvalidFolderRef> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Root),
            Some(other) => Self::parse_listing(other),
        }
    }

    /// The folder id, if this is not the root.
    pub fn folder_id(&self) -> Option<FolderId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(*id),
        }
    }

    /// Whether this references the top level.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl From<Option<FolderId>> for FolderRef {
    fn from(parent: Option<FolderId>) -> Self {
        match parent {
            Some(id) => Self::Folder(id),
            None => Self::Root,
        }
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "{ROOT_SENTINEL}"),
            Self::Folder(id) => write!(f, "{id}"),
        }
    }
}
