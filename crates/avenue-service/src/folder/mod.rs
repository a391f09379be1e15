//! Folder creation, listing, and deletion.

pub mod service;

pub use service::FolderService;
