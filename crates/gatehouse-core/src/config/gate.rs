//! Request gate configuration: protected paths, login page, static root,
//! and response hardening.

use serde::{Deserialize, Serialize};

/// Default `Content-Security-Policy` value.
pub const DEFAULT_CONTENT_SECURITY_POLICY: &str = "default-src 'self' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
style-src 'self' 'unsafe-inline' https://cdnjs.cloudflare.com";

/// Request gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Paths that need a valid session. An entry ending in `*` matches
    /// every path starting with the text before it; any other entry must
    /// match the request path exactly.
    #[serde(default)]
    pub protected_paths: Vec<String>,
    /// Where unauthenticated requests for protected paths are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Directory served to requests that pass the gate.
    #[serde(default = "default_document_root")]
    pub document_root: String,
    /// Attach the hardening headers to every response.
    #[serde(default)]
    pub security_headers: bool,
    /// `Content-Security-Policy` value used when `security_headers` is on.
    #[serde(default = "default_csp")]
    pub content_security_policy: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_paths: Vec::new(),
            login_path: default_login_path(),
            document_root: default_document_root(),
            security_headers: false,
            content_security_policy: default_csp(),
        }
    }
}

fn default_login_path() -> String {
    "/login.html".to_string()
}

fn default_document_root() -> String {
    "public".to_string()
}

fn default_csp() -> String {
    DEFAULT_CONTENT_SECURITY_POLICY.to_string()
}
