//! Catalog traits and the bundle handed to services.
//!
//! Every operation is a single-row (or single-statement) action; the
//! catalog offers no multi-statement transactions to its callers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use avenue_core::config::{CatalogBackend, DatabaseConfig};
use avenue_core::result::AppResult;
use avenue_core::types::{FileId, FolderId, FolderRef, UserId};
use avenue_entity::file::{CreateFile, File};
use avenue_entity::folder::{CreateFolder, Folder};
use avenue_entity::user::{CreateUser, User};

use crate::connection::DatabasePool;
use crate::memory::MemoryCatalog;
use crate::migration::run_migrations;
use crate::repositories::{FileRepository, FolderRepository, UserRepository};

/// File rows.
#[async_trait]
pub trait FileCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a file row with a pending size.
    ///
    /// Fails with `CatalogWrite` when the insert is rejected, including a
    /// parent that does not exist or belongs to another owner.
    async fn insert(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a live file owned by `owner`.
    async fn find_by_id(&self, owner: UserId, id: FileId) -> AppResult<Option<File>>;

    /// All live files owned by `owner`, in insertion order.
    async fn find_by_owner(&self, owner: UserId) -> AppResult<Vec<File>>;

    /// Live files directly under `parent`.
    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<File>>;

    /// Record the final byte count. Fails with `NotFound` if the row is gone.
    async fn update_size(&self, id: FileId, size_bytes: i64) -> AppResult<()>;

    /// Delete a row. Returns `false` if no row matched.
    async fn delete(&self, id: FileId) -> AppResult<bool>;
}

/// Folder rows.
#[async_trait]
pub trait FolderCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a folder row.
    ///
    /// Fails with `InvalidParent` when the parent does not exist (or is not
    /// the owner's) at insert time, and `CatalogWrite` otherwise.
    async fn insert(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Find a folder owned by `owner`.
    async fn find_by_id(&self, owner: UserId, id: FolderId) -> AppResult<Option<Folder>>;

    /// Folders directly under `parent`.
    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<Folder>>;

    /// Delete an empty folder. Fails with `Conflict` while it still has
    /// child folders or files. Returns `false` if no row matched.
    async fn delete(&self, owner: UserId, id: FolderId) -> AppResult<bool>;
}

/// User rows.
#[async_trait]
pub trait UserCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a user. Fails with `Conflict` on a duplicate username or email.
    async fn insert(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by id, including soft-deleted users.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Change the email address. Fails with `Conflict` if it is taken.
    async fn update_email(&self, id: UserId, email: &str) -> AppResult<User>;

    /// Replace the stored password hash.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()>;

    /// Enable or disable login.
    async fn set_can_login(&self, id: UserId, can_login: bool) -> AppResult<()>;

    /// Stamp the soft-delete timestamp and disable login.
    async fn soft_delete(&self, id: UserId) -> AppResult<()>;

    /// Create or reset the bootstrap `root` user with id 1.
    async fn upsert_root(&self, password_hash: &str) -> AppResult<User>;
}

/// The three catalog tables, behind trait objects.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// File rows.
    pub files: Arc<dyn FileCatalog>,
    /// Folder rows.
    pub folders: Arc<dyn FolderCatalog>,
    /// User rows.
    pub users: Arc<dyn UserCatalog>,
}

impl Catalog {
    /// A fresh in-memory catalog.
    pub fn memory() -> Self {
        let tables = Arc::new(MemoryCatalog::new());
        Self {
            files: tables.clone(),
            folders: tables.clone(),
            users: tables,
        }
    }

    /// A catalog backed by PostgreSQL.
    pub fn postgres(pool: &DatabasePool) -> Self {
        let pool = pool.pool().clone();
        Self {
            files: Arc::new(FileRepository::new(pool.clone())),
            folders: Arc::new(FolderRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }

    /// Build the configured catalog, running migrations for PostgreSQL.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            CatalogBackend::Memory => {
                info!("Using in-memory catalog");
                Ok(Self::memory())
            }
            CatalogBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                run_migrations(pool.pool()).await?;
                Ok(Self::postgres(&pool))
            }
        }
    }
}
