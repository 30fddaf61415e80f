//! # gatehouse-core
//!
//! Shared foundation for every Gatehouse crate: the unified error type,
//! configuration schema, and the seam traits that storage and time
//! providers implement.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
