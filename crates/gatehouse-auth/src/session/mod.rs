//! Session issuance, lookup, and expiry.

pub mod cleanup;
pub mod manager;
pub mod store;
pub mod token;

pub use cleanup::SessionCleanup;
pub use manager::{ActiveSession, LoginResult, SessionManager};
pub use store::SessionStore;
