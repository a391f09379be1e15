//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::types::{FolderId, FolderRef, UserId};
use avenue_entity::folder::{CreateFolder, Folder};

use super::foreign_key_violation;
use crate::catalog::FolderCatalog;

/// Repository for folder rows and one-level tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderCatalog for FolderRepository {
    async fn insert(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, parent_id, owner_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match foreign_key_violation(&e) {
            Some(constraint) if constraint == "folders_parent_fk" => {
                AppError::invalid_parent("Parent folder must exist")
            }
            _ => AppError::with_source(ErrorKind::CatalogWrite, "Failed to create folder", e),
        })
    }

    async fn find_by_id(&self, owner: UserId, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Catalog, "Failed to find folder", e))
    }

    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
             ORDER BY created_at ASC",
        )
        .bind(owner)
        .bind(parent.folder_id())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Catalog, "Failed to list child folders", e))
    }

    async fn delete(&self, owner: UserId, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| match foreign_key_violation(&e) {
                Some(_) => AppError::conflict(format!("Folder {id} is not empty")),
                None => {
                    AppError::with_source(ErrorKind::CatalogWrite, "Failed to delete folder", e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }
}
