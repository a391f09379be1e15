//! Streaming file downloads.

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::result::AppResult;
use avenue_core::traits::{BlobStore, ByteStream};
use avenue_core::types::FileId;
use avenue_database::FileCatalog;
use avenue_entity::file::File;

use crate::context::RequestContext;

/// A file's metadata together with a stream over its bytes.
///
/// The stream holds the only open handle on the blob; dropping it early
/// releases the handle.
pub struct Download {
    /// File metadata.
    pub file: File,
    /// Chunks of at most the configured size, in order.
    pub stream: ByteStream,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

/// Opens files for streaming reads.
#[derive(Debug, Clone)]
pub struct DownloadService {
    files: Arc<dyn FileCatalog>,
    blobs: Arc<dyn BlobStore>,
    chunk_size: usize,
}

impl DownloadService {
    /// Creates a new download service emitting `chunk_size`-byte chunks.
    pub fn new(files: Arc<dyn FileCatalog>, blobs: Arc<dyn BlobStore>, chunk_size: usize) -> Self {
        Self {
            files,
            blobs,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Look up a file and open its bytes.
    ///
    /// A missing row and a missing blob both surface as `NotFound`; the
    /// latter is logged as a consistency violation. A read error mid-stream
    /// ends the stream with `StorageIo`.
    pub async fn download(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<Download> {
        let file = self
            .files
            .find_by_id(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id = %ctx.user_id, file_id = %file_id, "Download of unknown file");
                AppError::not_found(format!("File {file_id} not found"))
            })?;

        let path = file.blob_path();
        let reader = self.blobs.open(&path).await.map_err(|e| {
            if e.is(ErrorKind::NotFound) {
                warn!(
                    file_id = %file.id,
                    %path,
                    "Catalog row has no blob; catalog and blob store disagree"
                );
            }
            e
        })?;

        let stream = ReaderStream::with_capacity(reader, self.chunk_size).map(move |chunk| {
            chunk.map_err(|e| {
                AppError::with_source(ErrorKind::StorageIo, format!("Failed reading {path}"), e)
            })
        });

        Ok(Download {
            file,
            stream: Box::pin(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::upload::{UploadRequest, UploadService};
    use crate::testing::{FailingReadBlobStore, source};
    use avenue_core::types::UserId;
    use avenue_database::MemoryCatalog;
    use avenue_storage::MemoryBlobStore;

    fn services(chunk: usize) -> (UploadService, DownloadService, Arc<MemoryBlobStore>) {
        let catalog = Arc::new(MemoryCatalog::new());
        let blobs = Arc::new(MemoryBlobStore::default());
        (
            UploadService::new(catalog.clone(), blobs.clone()),
            DownloadService::new(catalog, blobs.clone(), chunk),
            blobs,
        )
    }

    #[tokio::test]
    async fn test_chunks_are_bounded() {
        let (up, down, _) = services(4096);
        let ctx = RequestContext::new(UserId(1));
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let file = up
            .upload(&ctx, UploadRequest::new("a", "bin", source(&data)))
            .await
            .unwrap();

        let download = down.download(&ctx, file.id).await.unwrap();
        let chunks: Vec<_> = download
            .stream
            .map(|c| c.unwrap())
            .collect::<Vec<_>>()
            .await;
        assert!(chunks.iter().all(|c| c.len() <= 4096));
        assert_eq!(chunks.concat(), data);
    }

    #[tokio::test]
    async fn test_other_owner_sees_not_found() {
        let (up, down, _) = services(4096);
        let file = up
            .upload(
                &RequestContext::new(UserId(1)),
                UploadRequest::new("a", "bin", source(b"secret")),
            )
            .await
            .unwrap();

        let err = down
            .download(&RequestContext::new(UserId(2)), file.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_found() {
        let (up, down, blobs) = services(4096);
        let ctx = RequestContext::new(UserId(1));
        let file = up
            .upload(&ctx, UploadRequest::new("a", "bin", source(b"data")))
            .await
            .unwrap();
        blobs.remove(&file.blob_path()).await.unwrap();

        let err = down.download(&ctx, file.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_read_error_ends_stream() {
        let catalog = Arc::new(MemoryCatalog::new());
        let blobs = Arc::new(FailingReadBlobStore::new(MemoryBlobStore::default(), 5000));
        let up = UploadService::new(catalog.clone(), blobs.clone());
        let down = DownloadService::new(catalog, blobs, 4096);

        let ctx = RequestContext::new(UserId(1));
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let file = up
            .upload(&ctx, UploadRequest::new("a", "bin", source(&data)))
            .await
            .unwrap();

        let download = down.download(&ctx, file.id).await.unwrap();
        let items: Vec<_> = download.stream.collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().len(), 4096);
        assert_eq!(items[1].as_ref().unwrap().len(), 904);
        assert_eq!(items[2].as_ref().unwrap_err().kind, ErrorKind::StorageIo);

        let delivered: Vec<u8> = items[..2]
            .iter()
            .flat_map(|c| c.as_ref().unwrap().to_vec())
            .collect();
        assert_eq!(delivered, data[..5000]);
    }
}
