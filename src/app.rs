//! Wires configuration into the catalog, blob store, auth, and services.

use std::sync::Arc;

use tracing::info;

use avenue_auth::{PasswordPolicy, SessionAuthenticator, SessionStore};
use avenue_core::config::AppConfig;
use avenue_core::error::AppError;
use avenue_core::result::AppResult;
use avenue_database::Catalog;
use avenue_service::{HierarchyManager, RequestContext, UserService};

/// Everything a command needs.
#[derive(Debug)]
pub struct App {
    pub config: AppConfig,
    pub hierarchy: HierarchyManager,
    pub users: UserService,
    pub auth: SessionAuthenticator,
}

impl App {
    /// Connect to the configured catalog and blob store.
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        let catalog = Catalog::from_config(&config.database).await?;
        let blobs = avenue_storage::from_config(&config.storage).await?;

        let sessions = Arc::new(
            SessionStore::load(&config.auth.session_file, config.auth.session_ttl_hours).await?,
        );
        sessions.purge_expired();

        let hierarchy =
            HierarchyManager::new(&catalog, blobs, config.storage.chunk_size_bytes);
        let users = UserService::new(catalog.users.clone(), PasswordPolicy::new(&config.auth));
        let auth = SessionAuthenticator::new(sessions, catalog.users.clone());

        info!(
            catalog = ?config.database.backend,
            blobs = ?config.storage.backend,
            "Avenue ready"
        );
        Ok(Self {
            config,
            hierarchy,
            users,
            auth,
        })
    }

    /// Resolve `--session` into a request context.
    pub async fn context(&self, session: Option<&str>) -> AppResult<RequestContext> {
        let token = session
            .ok_or_else(|| AppError::unauthorized("This command needs --session <token>"))?;
        RequestContext::authenticate(&self.auth, token).await
    }

    /// Write live sessions back to disk.
    pub async fn save_sessions(&self) -> AppResult<()> {
        self.auth
            .sessions()
            .save(&self.config.auth.session_file)
            .await
    }
}
