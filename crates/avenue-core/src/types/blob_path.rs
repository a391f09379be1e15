//! Deterministic blob locations derived from `(owner, file id)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{FileId, UserId};

/// Location of a file's bytes inside the blob store: `/{owner}/{file}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobPath {
    owner: UserId,
    file: FileId,
}

impl BlobPath {
    /// Derive the blob path for a file owned by `owner`.
    pub fn for_file(owner: UserId, file: FileId) -> Self {
        Self { owner, file }
    }

    /// The namespace (per-user directory) this blob lives in.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// The file id naming this blob.
    pub fn file(&self) -> FileId {
        self.file
    }

    /// The namespace path, `/{owner}`.
    pub fn namespace(&self) -> String {
        namespace_path(self.owner)
    }

    /// Relative components, for joining onto a filesystem root.
    pub fn segments(&self) -> [String; 2] {
        [self.owner.to_string(), self.file.to_string()]
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.owner, self.file)
    }
}

/// Path of a user's blob namespace.
pub fn namespace_path(owner: UserId) -> String {
    format!("/{owner}")
}
