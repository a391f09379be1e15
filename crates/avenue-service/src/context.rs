//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use avenue_core::result::AppResult;
use avenue_core::traits::Authenticator;
use avenue_core::types::UserId;

/// Context for the current authenticated request.
///
/// Every Hierarchy Manager operation acts on behalf of `user_id`; rows
/// owned by anyone else are invisible to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for an already-authenticated user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }

    /// Resolve a credential through the auth collaborator.
    pub async fn authenticate(auth: &dyn Authenticator, credential: &str) -> AppResult<Self> {
        let user_id = auth.authenticate(credential).await?;
        Ok(Self::new(user_id))
    }
}
