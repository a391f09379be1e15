//! # avenue-service
//!
//! Business logic for Avenue. The [`HierarchyManager`] keeps the metadata
//! catalog and the blob store consistent: uploads run as a saga with
//! compensating actions, deletes remove bytes before the row, and folder
//! creation validates the parent. [`UserService`] covers accounts.

pub mod context;
pub mod file;
pub mod folder;
pub mod hierarchy;
pub mod user;

#[cfg(test)]
mod testing;

pub use context::RequestContext;
pub use file::{Download, DownloadService, FileService, UploadRequest, UploadService, UploadState};
pub use folder::FolderService;
pub use hierarchy::HierarchyManager;
pub use user::{RegisterRequest, UserService};
