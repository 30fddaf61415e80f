//! Convenience result alias.

use crate::error::AppError;

/// Result type used across all Gatehouse crates.
pub type AppResult<T> = Result<T, AppError>;
