//! Core type definitions used across the Avenue workspace.

pub mod blob_path;
pub mod folder_ref;
pub mod id;

pub use blob_path::{BlobPath, namespace_path};
pub use folder_ref::{FolderRef, InvalidFolderRef, ROOT_SENTINEL};
pub use id::{FileId, FolderId, UserId};
