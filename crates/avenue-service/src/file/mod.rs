//! File operations: the upload saga, streaming download, lookup, delete.

pub mod download;
pub mod service;
pub mod upload;

pub use download::{Download, DownloadService};
pub use service::FileService;
pub use upload::{UploadRequest, UploadService, UploadState};
