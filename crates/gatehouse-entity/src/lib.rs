//! # gatehouse-entity
//!
//! Domain models for Gatehouse. Every struct here is either a persisted
//! record (accounts, sessions) or a closed value set (roles, permissions).

pub mod account;
pub mod permission;
pub mod session;

pub use account::{Account, AccountProfile, UserRole};
pub use permission::Permission;
pub use session::{Session, SessionToken};
