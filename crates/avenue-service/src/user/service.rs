//! User registration and self-service operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use avenue_auth::password::{PasswordHasher, PasswordPolicy};
use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_core::types::UserId;
use avenue_database::UserCatalog;
use avenue_entity::user::{CreateUser, User};

use crate::context::RequestContext;

/// Registration input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address, used to log in.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Username; defaults to the email address.
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: Option<String>,
    /// Plaintext password.
    pub password: String,
}

#[derive(Debug, Validate)]
struct EmailChange {
    #[validate(email(message = "Invalid email format"))]
    email: String,
}

fn validation_error(e: validator::ValidationErrors) -> AppError {
    AppError::validation(e.to_string())
}

/// Account lifecycle and profile updates.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserCatalog>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserCatalog>, policy: PasswordPolicy) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
            policy,
        }
    }

    /// Register a new account that can log in immediately.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        req.validate().map_err(validation_error)?;
        self.policy.validate(&req.password)?;

        let email = req.email.trim().to_string();
        let username = req.username.unwrap_or_else(|| email.clone());
        let user = self
            .users
            .insert(&CreateUser {
                username,
                email,
                password_hash: self.hasher.hash_password(&req.password)?,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// The caller's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.find(ctx.user_id).await
    }

    /// Change the caller's email. Fails with `Conflict` if it is taken.
    pub async fn update_email(&self, ctx: &RequestContext, email: &str) -> AppResult<User> {
        let change = EmailChange {
            email: email.trim().to_string(),
        };
        change.validate().map_err(validation_error)?;

        let user = self.users.update_email(ctx.user_id, &change.email).await?;
        info!(user_id = %user.id, "Email updated");
        Ok(user)
    }

    /// Change the caller's password after checking the current one.
    pub async fn update_password(
        &self,
        ctx: &RequestContext,
        current: &str,
        new: &str,
    ) -> AppResult<()> {
        let user = self.find(ctx.user_id).await?;
        if !self.hasher.verify_password(current, &user.password_hash)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }
        if current == new {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        self.policy.validate_new(new)?;

        let hash = self.hasher.hash_password(new)?;
        self.users.update_password(user.id, &hash).await?;
        info!(user_id = %user.id, "Password updated");
        Ok(())
    }

    /// Stop a user from logging in.
    pub async fn disable(&self, user_id: UserId) -> AppResult<()> {
        self.users.set_can_login(user_id, false).await?;
        info!(user_id = %user_id, "User disabled");
        Ok(())
    }

    /// Soft-delete a user.
    pub async fn soft_delete(&self, user_id: UserId) -> AppResult<()> {
        self.users.soft_delete(user_id).await?;
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Create or reset the bootstrap `root` account.
    pub async fn ensure_root_user(&self, password: &str) -> AppResult<User> {
        self.policy.validate(password)?;
        let hash = self.hasher.hash_password(password)?;
        let root = self.users.upsert_root(&hash).await?;
        info!(user_id = %root.id, "Root user ensured");
        Ok(root)
    }

    async fn find(&self, id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .filter(|u| u.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}
