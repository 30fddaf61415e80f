//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds; also the cookie `Max-Age`.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Emit `SameSite=Strict` on the session cookie.
    #[serde(default = "default_true")]
    pub same_site_strict: bool,
    /// Interval for the expired-session sweep in seconds. `0` disables it.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Drop every persisted session when the process starts.
    #[serde(default)]
    pub reset_on_start: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            cookie_name: default_cookie_name(),
            same_site_strict: true,
            cleanup_interval_seconds: default_cleanup_interval(),
            reset_on_start: false,
        }
    }
}

fn default_ttl() -> u64 {
    24 * 60 * 60
}

fn default_cookie_name() -> String {
    "session_id".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    300
}
