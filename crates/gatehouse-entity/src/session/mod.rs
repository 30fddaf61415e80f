//! Session records and tokens.

pub mod model;
pub mod token;

pub use model::Session;
pub use token::SessionToken;
