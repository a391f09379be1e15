//! Folder domain entities.

pub mod contents;
pub mod model;

pub use contents::FolderContents;
pub use model::{CreateFolder, Folder};
