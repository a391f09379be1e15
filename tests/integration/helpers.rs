//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use futures::StreamExt;
use tempfile::TempDir;

use avenue_auth::{PasswordPolicy, SessionAuthenticator, SessionStore};
use avenue_core::result::AppResult;
use avenue_core::traits::{BlobStore, ByteSource};
use avenue_database::Catalog;
use avenue_entity::file::File;
use avenue_service::{Download, HierarchyManager, RegisterRequest, RequestContext, UploadRequest, UserService};
use avenue_storage::{LocalBlobStore, MemoryBlobStore};

/// Chunk size used by every test manager.
pub const CHUNK: usize = 4096;

/// Test application context
pub struct TestApp {
    /// The Hierarchy Manager under test
    pub hierarchy: HierarchyManager,
    /// Account service
    pub users: UserService,
    /// Session authenticator
    pub auth: SessionAuthenticator,
    /// The injected blob store, for inspecting bytes directly
    pub blobs: Arc<dyn BlobStore>,
    /// Keeps a local blob root alive
    _dir: Option<TempDir>,
}

impl TestApp {
    /// In-memory catalog with an in-memory blob store.
    pub fn memory() -> Self {
        Self::with_store(Arc::new(MemoryBlobStore::default()), None)
    }

    /// In-memory catalog with a capacity-limited blob store.
    pub fn memory_with_capacity(bytes: u64) -> Self {
        Self::with_store(Arc::new(MemoryBlobStore::new(Some(bytes))), None)
    }

    /// In-memory catalog with a local-disk blob store in a temp dir.
    pub async fn local() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LocalBlobStore::new(dir.path().to_str().expect("utf-8 temp path"))
            .await
            .expect("Failed to init local blob store");
        Self::with_store(Arc::new(store), Some(dir))
    }

    /// Both blob store variants, for properties that must hold for each.
    pub async fn all() -> Vec<(&'static str, Self)> {
        vec![("memory", Self::memory()), ("local", Self::local().await)]
    }

    fn with_store(blobs: Arc<dyn BlobStore>, dir: Option<TempDir>) -> Self {
        let catalog = Catalog::memory();
        Self {
            hierarchy: HierarchyManager::new(&catalog, blobs.clone(), CHUNK),
            users: UserService::new(catalog.users.clone(), PasswordPolicy::default()),
            auth: SessionAuthenticator::new(
                Arc::new(SessionStore::new(12).expect("Invalid session TTL")),
                catalog.users.clone(),
            ),
            blobs,
            _dir: dir,
        }
    }

    /// Register an account and return its session token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        self.users
            .register(RegisterRequest {
                email: email.to_string(),
                username: None,
                password: password.to_string(),
            })
            .await
            .expect("Failed to register");
        self.auth
            .login(email, password)
            .await
            .expect("Failed to log in")
            .token
    }

    /// Register, log in, and authenticate a fresh user.
    pub async fn user(&self, email: &str) -> RequestContext {
        let token = self.register_and_login(email, "password").await;
        RequestContext::authenticate(&self.auth, &token)
            .await
            .expect("Failed to authenticate")
    }

    /// Upload `bytes` as `name.extension` under `parent`.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        name: &str,
        extension: &str,
        parent: Option<&str>,
        bytes: &[u8],
    ) -> AppResult<File> {
        let mut req = UploadRequest::new(name, extension, source(bytes));
        req.parent = parent.map(str::to_string);
        self.hierarchy.upload(ctx, req).await
    }

    /// Whether the blob behind `file` can be opened.
    pub async fn blob_readable(&self, file: &File) -> bool {
        self.blobs.open(&file.blob_path()).await.is_ok()
    }
}

/// A byte source over an owned copy of `bytes`.
pub fn source(bytes: &[u8]) -> ByteSource {
    Box::pin(std::io::Cursor::new(bytes.to_vec()))
}

/// Drain a download, checking chunk bounds along the way.
pub async fn read_all(download: Download) -> Vec<u8> {
    let chunks: Vec<_> = download
        .stream
        .map(|chunk| chunk.expect("Stream failed"))
        .collect()
        .await;
    assert!(chunks.iter().all(|c| c.len() <= CHUNK));
    chunks.concat()
}

/// Deterministic, non-repeating-looking test payload.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}
