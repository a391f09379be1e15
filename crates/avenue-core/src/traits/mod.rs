//! Core traits defined in `avenue-core` and implemented by other crates.

pub mod auth;
pub mod storage;

pub use auth::Authenticator;
pub use storage::{BlobReader, BlobStore, BlobWriter, ByteSource, ByteStream};
