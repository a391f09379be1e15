//! Login, logout, and token authentication.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_core::traits::Authenticator;
use avenue_core::types::UserId;
use avenue_database::UserCatalog;

use super::store::{Session, SessionStore};
use crate::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Resolves session tokens to users and issues sessions at login.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    sessions: Arc<SessionStore>,
    users: Arc<dyn UserCatalog>,
    hasher: PasswordHasher,
}

impl SessionAuthenticator {
    /// Creates an authenticator over the given session store and user table.
    pub fn new(sessions: Arc<SessionStore>, users: Arc<dyn UserCatalog>) -> Self {
        Self {
            sessions,
            users,
            hasher: PasswordHasher::new(),
        }
    }

    /// The underlying session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Check credentials and start a session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !user.is_active() {
            warn!(user_id = %user.id, "Login attempt on disabled account");
            return Err(AppError::unauthorized("Account is disabled"));
        }

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let session = self.sessions.create(user.id);
        info!(user_id = %user.id, "Login successful");
        Ok(session)
    }

    /// Invalidate a session token.
    pub fn logout(&self, token: &str) -> AppResult<()> {
        if !self.sessions.revoke(token) {
            return Err(AppError::unauthorized("Unknown session"));
        }
        info!("Logged out");
        Ok(())
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn authenticate(&self, credential: &str) -> AppResult<UserId> {
        let session = self
            .sessions
            .get(credential)
            .ok_or_else(|| AppError::unauthorized("Session is invalid or expired"))?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .filter(|u| u.is_active())
            .ok_or_else(|| {
                self.sessions.revoke(credential);
                AppError::unauthorized("Account is disabled")
            })?;

        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avenue_core::error::ErrorKind;
    use avenue_database::MemoryCatalog;
    use avenue_entity::user::CreateUser;

    async fn setup() -> (SessionAuthenticator, Arc<MemoryCatalog>, UserId) {
        let catalog = Arc::new(MemoryCatalog::new());
        let hash = PasswordHasher::new().hash_password("hunter22").unwrap();
        let user = UserCatalog::insert(
            catalog.as_ref(),
            &CreateUser {
                username: "ada".into(),
                email: "ada@example.com".into(),
                password_hash: hash,
            },
        )
        .await
        .unwrap();
        let sessions = Arc::new(SessionStore::new(12).unwrap());
        let auth = SessionAuthenticator::new(sessions, catalog.clone());
        (auth, catalog, user.id)
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let (auth, _, id) = setup().await;
        let session = auth.login("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(auth.authenticate(&session.token).await.unwrap(), id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let (auth, _, _) = setup().await;
        let err = auth.login("ada@example.com", "nope").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        let err = auth.login("bob@example.com", "hunter22").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_logout_invalidates() {
        let (auth, _, _) = setup().await;
        let session = auth.login("ada@example.com", "hunter22").await.unwrap();
        auth.logout(&session.token).unwrap();
        let err = auth.authenticate(&session.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(auth.logout(&session.token).is_err());
    }

    #[tokio::test]
    async fn test_disabled_user_is_rejected() {
        let (auth, catalog, id) = setup().await;
        let session = auth.login("ada@example.com", "hunter22").await.unwrap();
        catalog.set_can_login(id, false).await.unwrap();

        let err = auth.authenticate(&session.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        let err = auth.login("ada@example.com", "hunter22").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
