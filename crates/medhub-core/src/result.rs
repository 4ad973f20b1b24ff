//! Convenience result type alias for MedHub.

use crate::error::AppError;

/// A specialized `Result` type for MedHub operations.
pub type AppResult<T> = Result<T, AppError>;
