//! # gatehouse-api
//!
//! HTTP surface of Gatehouse: the request gate, the auth endpoints under
//! both `/auth` and `/api/auth`, the static-file fallback, and the TLS and
//! plaintext-redirect listeners.

pub mod app;
pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

pub use app::{build_state, run_server};
pub use router::build_router;
pub use state::AppState;
