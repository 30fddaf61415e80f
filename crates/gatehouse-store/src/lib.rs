//! # gatehouse-store
//!
//! [`DocumentStore`](gatehouse_core::traits::DocumentStore) backends:
//!
//! - `json_file`: one pretty-printed JSON file per table, replaced atomically
//! - `memory`: process-local table for tests, with write-failure injection

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
