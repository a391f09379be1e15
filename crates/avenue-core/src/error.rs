//! Unified application error types for Avenue.
//!
//! Every crate maps its internal failures into [`AppError`] so that the
//! Hierarchy Manager can surface a single typed error to its caller.

use std::fmt;
use thiserror::Error;

/// Error categories surfaced by Avenue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The referenced file, folder, or user does not exist.
    NotFound,
    /// The parent folder named at creation time does not exist.
    InvalidParent,
    /// A catalog read failed.
    Catalog,
    /// A catalog insert, update, or delete failed.
    CatalogWrite,
    /// Writing blob bytes failed.
    BlobWrite,
    /// A blob read, open, or removal failed.
    StorageIo,
    /// The per-user blob namespace could not be ensured.
    Namespace,
    /// The caller could not be authenticated.
    Unauthorized,
    /// Input validation failed.
    Validation,
    /// The operation conflicts with existing state.
    Conflict,
    /// Configuration is missing or invalid.
    Configuration,
    /// Serialization or deserialization failed.
    Serialization,
    /// An unexpected internal failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidParent => write!(f, "INVALID_PARENT"),
            Self::Catalog => write!(f, "CATALOG"),
            Self::CatalogWrite => write!(f, "CATALOG_WRITE"),
            Self::BlobWrite => write!(f, "BLOB_WRITE"),
            Self::StorageIo => write!(f, "STORAGE_IO"),
            Self::Namespace => write!(f, "NAMESPACE"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Avenue.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-parent error.
    pub fn invalid_parent(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParent, message)
    }

    /// Create a catalog read error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Catalog, message)
    }

    /// Create a catalog write error.
    pub fn catalog_write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CatalogWrite, message)
    }

    /// Create a blob write error.
    pub fn blob_write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BlobWrite, message)
    }

    /// Create a storage I/O error.
    pub fn storage_io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageIo, message)
    }

    /// Create a namespace error.
    pub fn namespace(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Namespace, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::StorageIo, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
