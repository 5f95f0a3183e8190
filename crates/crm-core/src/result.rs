//! Convenience result type alias.

use crate::error::AppError;

/// A specialized `Result` type for browser and client operations.
///
/// Every crate in the workspace returns this instead of spelling out
/// `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
