//! Local filesystem blob store.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::traits::{BlobReader, BlobStore, BlobWriter};
use avenue_core::types::{BlobPath, UserId};

/// Blob store keeping each user's files in a directory under `root`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The directory every namespace lives under.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn namespace_dir(&self, owner: UserId) -> PathBuf {
        self.root.join(owner.to_string())
    }

    fn resolve(&self, path: &BlobPath) -> PathBuf {
        let [owner, file] = path.segments();
        self.root.join(owner).join(file)
    }
}

fn read_error(e: io::Error, action: &str, path: &BlobPath) -> AppError {
    if e.kind() == io::ErrorKind::NotFound {
        AppError::not_found(format!("Blob not found: {path}"))
    } else {
        AppError::with_source(
            ErrorKind::StorageIo,
            format!("Failed to {action} blob: {path}"),
            e,
        )
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn backend(&self) -> &str {
        "local"
    }

    async fn ensure_namespace(&self, owner: UserId) -> AppResult<()> {
        let dir = self.namespace_dir(owner);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Namespace,
                format!("Failed to create namespace: {}", dir.display()),
                e,
            )
        })
    }

    async fn create(&self, path: &BlobPath) -> AppResult<BlobWriter> {
        let file = fs::File::create(self.resolve(path)).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::BlobWrite,
                format!("Failed to create blob: {path}"),
                e,
            )
        })?;
        debug!(%path, "Created blob");
        Ok(Box::pin(file))
    }

    async fn open(&self, path: &BlobPath) -> AppResult<BlobReader> {
        let file = fs::File::open(self.resolve(path))
            .await
            .map_err(|e| read_error(e, "open", path))?;
        Ok(Box::pin(file))
    }

    async fn remove(&self, path: &BlobPath) -> AppResult<()> {
        fs::remove_file(self.resolve(path))
            .await
            .map_err(|e| read_error(e, "remove", path))?;
        debug!(%path, "Removed blob");
        Ok(())
    }

    async fn exists(&self, path: &BlobPath) -> AppResult<bool> {
        fs::try_exists(self.resolve(path))
            .await
            .map_err(|e| read_error(e, "stat", path))
    }
}
