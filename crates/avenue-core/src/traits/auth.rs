//! Authentication capability consumed by the request layer.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::UserId;

/// Resolves an opaque request credential to an authenticated user.
///
/// Fails with `ErrorKind::Unauthorized` when the credential is unknown,
/// expired, or belongs to a user who may not log in.
#[async_trait]
pub trait Authenticator: Send + Sync + std::fmt::Debug + 'static {
    /// Authenticate a credential (a session token).
    async fn authenticate(&self, credential: &str) -> AppResult<UserId>;
}
