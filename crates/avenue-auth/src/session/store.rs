//! Synchronized in-process session map.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::types::UserId;

/// A live login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// The logged-in user.
    pub user_id: UserId,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Token to session map, safe to share across tasks.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions live for `ttl_hours`.
    ///
    /// Fails with `Configuration` when the lifetime cannot be represented
    /// as an expiry timestamp.
    pub fn new(ttl_hours: u64) -> Result<Self, AppError> {
        let ttl = i64::try_from(ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "auth.session_ttl_hours = {ttl_hours} is out of range"
                ))
            })?;
        Ok(Self {
            sessions: DashMap::new(),
            ttl,
        })
    }

    /// Start a session for `user_id`.
    pub fn create(&self, user_id: UserId) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(session.token.clone(), session.clone());
        debug!(user_id = %user_id, "Session created");
        session
    }

    /// Look up a live session. Expired entries are evicted on sight.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token).map(|s| s.value().clone())?;
        if session.is_expired_at(Utc::now()) {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    /// Invalidate a session. Returns `false` if the token was unknown.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Invalidate every session belonging to `user_id`.
    pub fn revoke_user(&self, user_id: UserId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        before - self.sessions.len()
    }

    /// Drop expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired_at(now));
        let purged = before - self.sessions.len();
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        purged
    }

    /// Number of stored sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Live sessions, for persisting between processes.
    pub fn snapshot(&self) -> Vec<Session> {
        let now = Utc::now();
        self.sessions
            .iter()
            .filter(|s| !s.is_expired_at(now))
            .map(|s| s.value().clone())
            .collect()
    }

    /// Insert previously snapshotted sessions, skipping expired ones.
    pub fn restore(&self, sessions: Vec<Session>) {
        let now = Utc::now();
        for session in sessions.into_iter().filter(|s| !s.is_expired_at(now)) {
            self.sessions.insert(session.token.clone(), session);
        }
    }

    /// Load a store from a JSON snapshot. A missing file yields an empty store.
    pub async fn load(path: impl AsRef<Path>, ttl_hours: u64) -> Result<Self, AppError> {
        let store = Self::new(ttl_hours)?;
        let path = path.as_ref();
        match tokio::fs::read(path).await {
            Ok(raw) => store.restore(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Internal,
                    format!("Failed to read session file: {}", path.display()),
                    e,
                ));
            }
        }
        Ok(store)
    }

    /// Write the live sessions to a JSON snapshot.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(&self.snapshot())?;
        tokio::fs::write(path, raw).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to write session file: {}", path.display()),
                e,
            )
        })
    }
}
