//! Core traits defined in `gatehouse-core` and implemented by other crates.

pub mod clock;
pub mod document;

pub use clock::{Clock, ManualClock, SystemClock};
pub use document::{Document, DocumentStore};
