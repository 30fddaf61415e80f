//! # gatehouse-auth
//!
//! Credential verification, session issuance, and role permissions.
//!
//! ## Modules
//!
//! - `account`: account table with create and verify
//! - `authenticator`: identity + secret check used by login
//! - `bootstrap`: idempotent seeding of default accounts
//! - `password`: Argon2id hashing
//! - `rbac`: role to permission table
//! - `registration`: self-service account creation with input rules
//! - `session`: session table, login/logout/check flows, expiry sweep

pub mod account;
pub mod authenticator;
pub mod bootstrap;
pub mod password;
pub mod rbac;
pub mod registration;
pub mod session;

pub use account::AccountStore;
pub use authenticator::Authenticator;
pub use password::PasswordHasher;
pub use rbac::RbacPolicies;
pub use registration::RegistrationService;
pub use session::{SessionCleanup, SessionManager, SessionStore};
