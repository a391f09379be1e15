//! # avenue-entity
//!
//! Domain entity models for Avenue. Every struct in this crate represents
//! a catalog row or a domain value object. Catalog rows additionally
//! derive `sqlx::FromRow`.

pub mod file;
pub mod folder;
pub mod user;

pub use file::{CreateFile, File};
pub use folder::{CreateFolder, Folder, FolderContents};
pub use user::{CreateUser, User};
