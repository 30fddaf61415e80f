//! Account records and roles.

pub mod model;
pub mod role;

pub use model::{Account, AccountProfile};
pub use role::UserRole;
