//! In-memory catalog.
//!
//! Implements all three catalog traits over process-local tables with the
//! same constraint semantics as the PostgreSQL schema: parent folders must
//! exist and share the owner, a folder with children cannot be deleted,
//! and usernames and emails are unique. Owner references to users are not
//! checked. Every operation takes the table lock once, so each call is
//! atomic like a single SQL statement.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_core::types::{FileId, FolderId, FolderRef, UserId};
use avenue_entity::file::{CreateFile, File, SIZE_PENDING};
use avenue_entity::folder::{CreateFolder, Folder};
use avenue_entity::user::{CreateUser, User};

use crate::catalog::{FileCatalog, FolderCatalog, UserCatalog};

const ROOT_USER_ID: UserId = UserId(1);

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    next_user_id: i64,
    folders: Vec<Folder>,
    files: Vec<File>,
}

impl Tables {
    fn parent_exists(&self, owner: UserId, parent: Option<FolderId>) -> bool {
        match parent {
            None => true,
            Some(id) => self
                .folders
                .iter()
                .any(|f| f.id == id && f.owner_id == owner),
        }
    }

    fn user_mut(&mut self, id: UserId) -> AppResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    fn ensure_unique(&self, id: Option<UserId>, username: &str, email: &str) -> AppResult<()> {
        for user in self.users.iter().filter(|u| Some(u.id) != id) {
            if user.username.eq_ignore_ascii_case(username) {
                return Err(AppError::conflict("Username already exists"));
            }
            if user.email.eq_ignore_ascii_case(email) {
                return Err(AppError::conflict("Email already exists"));
            }
        }
        Ok(())
    }
}

/// Process-local catalog tables.
#[derive(Debug)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_user_id: 1,
                ..Tables::default()
            }),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileCatalog for MemoryCatalog {
    async fn insert(&self, data: &CreateFile) -> AppResult<File> {
        let mut tables = self.tables.write().await;
        if !tables.parent_exists(data.owner_id, data.parent_id) {
            return Err(AppError::catalog_write(
                "File parent rejected by files_parent_fk",
            ));
        }
        if tables.files.iter().any(|f| f.id == data.id) {
            return Err(AppError::catalog_write(format!(
                "File {} already exists",
                data.id
            )));
        }

        let file = File {
            id: data.id,
            name: data.name.clone(),
            extension: data.extension.clone(),
            size_bytes: SIZE_PENDING,
            parent_id: data.parent_id,
            owner_id: data.owner_id,
            created_at: Utc::now(),
            deleted_at: None,
        };
        tables.files.push(file.clone());
        debug!(file_id = %file.id, "Inserted file row");
        Ok(file)
    }

    async fn find_by_id(&self, owner: UserId, id: FileId) -> AppResult<Option<File>> {
        let tables = self.tables.read().await;
        Ok(tables
            .files
            .iter()
            .find(|f| f.id == id && f.owner_id == owner && f.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> AppResult<Vec<File>> {
        let tables = self.tables.read().await;
        Ok(tables
            .files
            .iter()
            .filter(|f| f.owner_id == owner && f.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<File>> {
        let tables = self.tables.read().await;
        Ok(tables
            .files
            .iter()
            .filter(|f| f.owner_id == owner && f.parent() == parent && f.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn update_size(&self, id: FileId, size_bytes: i64) -> AppResult<()> {
        if size_bytes < 0 {
            return Err(AppError::catalog_write("File size must not be negative"));
        }
        let mut tables = self.tables.write().await;
        let file = tables
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.size_bytes = size_bytes;
        Ok(())
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.files.len();
        tables.files.retain(|f| f.id != id);
        Ok(tables.files.len() < before)
    }
}

#[async_trait]
impl FolderCatalog for MemoryCatalog {
    async fn insert(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut tables = self.tables.write().await;
        if !tables.parent_exists(data.owner_id, data.parent_id) {
            return Err(AppError::invalid_parent("Parent folder must exist"));
        }
        if tables.folders.iter().any(|f| f.id == data.id) {
            return Err(AppError::catalog_write(format!(
                "Folder {} already exists",
                data.id
            )));
        }

        let folder = Folder {
            id: data.id,
            name: data.name.clone(),
            parent_id: data.parent_id,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };
        tables.folders.push(folder.clone());
        Ok(folder)
    }

    async fn find_by_id(&self, owner: UserId, id: FolderId) -> AppResult<Option<Folder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .iter()
            .find(|f| f.id == id && f.owner_id == owner)
            .cloned())
    }

    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .iter()
            .filter(|f| f.owner_id == owner && f.parent() == parent)
            .cloned()
            .collect())
    }

    async fn delete(&self, owner: UserId, id: FolderId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.folders.iter().any(|f| f.id == id && f.owner_id == owner) {
            return Ok(false);
        }
        let has_children = tables.folders.iter().any(|f| f.parent_id == Some(id))
            || tables.files.iter().any(|f| f.parent_id == Some(id));
        if has_children {
            return Err(AppError::conflict(format!("Folder {id} is not empty")));
        }
        tables
            .folders
            .retain(|f| !(f.id == id && f.owner_id == owner));
        Ok(true)
    }
}

#[async_trait]
impl UserCatalog for MemoryCatalog {
    async fn insert(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique(None, &data.username, &data.email)?;

        let id = UserId(tables.next_user_id);
        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id,
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            can_login: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn update_email(&self, id: UserId, email: &str) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let username = tables.user_mut(id)?.username.clone();
        tables.ensure_unique(Some(id), &username, email)?;

        let user = tables.user_mut(id)?;
        user.email = email.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_can_login(&self, id: UserId, can_login: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        user.can_login = can_login;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn soft_delete(&self, id: UserId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        if user.deleted_at.is_some() {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        let now = Utc::now();
        user.deleted_at = Some(now);
        user.can_login = false;
        user.updated_at = now;
        Ok(())
    }

    async fn upsert_root(&self, password_hash: &str) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Ok(root) = tables.user_mut(ROOT_USER_ID) {
            root.password_hash = password_hash.to_string();
            root.can_login = true;
            root.deleted_at = None;
            root.updated_at = now;
            return Ok(root.clone());
        }

        tables.ensure_unique(Some(ROOT_USER_ID), "root", "root@localhost")?;
        let root = User {
            id: ROOT_USER_ID,
            username: "root".to_string(),
            email: "root@localhost".to_string(),
            password_hash: password_hash.to_string(),
            can_login: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(root.clone());
        tables.next_user_id = tables.next_user_id.max(ROOT_USER_ID.0 + 1);
        Ok(root)
    }
}
