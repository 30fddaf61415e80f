//! Role-based permissions.

pub mod policies;

pub use policies::RbacPolicies;
