//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::types::UserId;
use avenue_entity::user::{CreateUser, User};

use super::unique_violation;
use crate::catalog::UserCatalog;

/// Repository for user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or_write(e: sqlx::Error, context: &str) -> AppError {
    match unique_violation(&e) {
        Some(constraint) if constraint == "users_email_key" => {
            AppError::conflict("Email already exists")
        }
        Some(constraint) if constraint == "users_username_key" => {
            AppError::conflict("Username already exists")
        }
        _ => AppError::with_source(ErrorKind::CatalogWrite, context.to_string(), e),
    }
}

#[async_trait]
impl UserCatalog for UserRepository {
    async fn insert(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_write(e, "Failed to create user"))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Catalog, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Catalog, "Failed to find user by email", e)
            })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Catalog, "Failed to find user by username", e)
            })
    }

    async fn update_email(&self, id: UserId, email: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or_write(e, "Failed to update email"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::CatalogWrite, "Failed to update password", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    async fn set_can_login(&self, id: UserId, can_login: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET can_login = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(can_login)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::CatalogWrite, "Failed to set login flag", e)
                })?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: UserId) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), can_login = FALSE, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::CatalogWrite, "Failed to delete user", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    async fn upsert_root(&self, password_hash: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, can_login) \
             VALUES (1, 'root', 'root@localhost', $1, TRUE) \
             ON CONFLICT (id) DO UPDATE SET password_hash = EXCLUDED.password_hash, \
             can_login = TRUE, deleted_at = NULL, updated_at = NOW() \
             RETURNING *",
        )
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_write(e, "Failed to upsert root user"))?;

        // An explicit id bypasses the sequence; move it past the root row.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('users', 'id'), \
             GREATEST((SELECT MAX(id) FROM users), 1))",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::CatalogWrite, "Failed to sync user ids", e))?;

        Ok(user)
    }
}
