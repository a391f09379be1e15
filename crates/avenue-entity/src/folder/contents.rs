//! Immediate children of a folder reference.

use serde::{Deserialize, Serialize};

use crate::file::File;
use crate::folder::Folder;

/// One level of a listing: child folders and child files, not recursive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderContents {
    /// Immediate child folders.
    pub folders: Vec<Folder>,
    /// Immediate child files.
    pub files: Vec<File>,
}

impl FolderContents {
    /// Whether the listing holds no entries.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Total entry count.
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }
}
