//! # avenue-database
//!
//! The metadata catalog. Defines the catalog traits consumed by the
//! Hierarchy Manager, with PostgreSQL repositories for production and an
//! in-memory implementation for tests and ephemeral runs.

pub mod catalog;
pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use catalog::{Catalog, FileCatalog, FolderCatalog, UserCatalog};
pub use connection::DatabasePool;
pub use memory::MemoryCatalog;
