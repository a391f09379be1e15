//! Convenience result type alias for Avenue.

use crate::error::AppError;

/// A specialized `Result` type for Avenue operations.
pub type AppResult<T> = Result<T, AppError>;
