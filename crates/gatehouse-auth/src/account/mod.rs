//! Account table.

pub mod store;

pub use store::AccountStore;
