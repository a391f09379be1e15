//! File repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::types::{FileId, FolderRef, UserId};
use avenue_entity::file::{CreateFile, File};

use super::foreign_key_violation;
use crate::catalog::FileCatalog;

/// Repository for file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileCatalog for FileRepository {
    async fn insert(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, name, extension, size_bytes, parent_id, owner_id) \
             VALUES ($1, $2, $3, 0, $4, $5) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(&data.extension)
        .bind(data.parent_id)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match foreign_key_violation(&e) {
            Some(constraint) => AppError::with_source(
                ErrorKind::CatalogWrite,
                format!("File parent rejected by {constraint}"),
                e,
            ),
            None => AppError::with_source(ErrorKind::CatalogWrite, "Failed to insert file", e),
        })
    }

    async fn find_by_id(&self, owner: UserId, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Catalog, "Failed to find file", e))
    }

    async fn find_by_owner(&self, owner: UserId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Catalog, "Failed to list files", e))
    }

    async fn find_by_parent(&self, owner: UserId, parent: FolderRef) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 AND deleted_at IS NULL \
             ORDER BY created_at ASC",
        )
        .bind(owner)
        .bind(parent.folder_id())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Catalog, "Failed to list child files", e))
    }

    async fn update_size(&self, id: FileId, size_bytes: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE files SET size_bytes = $2 WHERE id = $1")
            .bind(id)
            .bind(size_bytes)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::CatalogWrite, "Failed to update file size", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("File {id} not found")));
        }
        Ok(())
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::CatalogWrite, "Failed to delete file", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
