//! Server, TLS, and CORS configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port of the primary listener (TLS when enabled).
    #[serde(default = "default_port")]
    pub port: u16,
    /// TLS configuration.
    #[serde(default)]
    pub tls: TlsConfig,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls: TlsConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// TLS termination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Path to the PEM certificate file.
    #[serde(default = "default_cert_path")]
    pub cert_path: String,
    /// Path to the PEM private key file.
    #[serde(default = "default_key_path")]
    pub key_path: String,
    /// Generate a self-signed pair with `openssl` when either file is missing.
    #[serde(default = "default_true")]
    pub generate_self_signed: bool,
    /// Certificate subject used for self-signed generation.
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Plaintext port that redirects to the TLS port. `0` disables it.
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cert_path: default_cert_path(),
            key_path: default_key_path(),
            generate_self_signed: true,
            subject: default_subject(),
            redirect_port: default_redirect_port(),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Whether CORS headers are emitted.
    #[serde(default)]
    pub enabled: bool,
    /// Allowed origins (`["*"]` allows any).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Allowed request headers.
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

fn default_cert_path() -> String {
    "certs/server.crt".to_string()
}

fn default_key_path() -> String {
    "certs/server.key".to_string()
}

fn default_subject() -> String {
    "/C=JP/ST=Tokyo/L=Tokyo/O=Gatehouse/CN=localhost".to_string()
}

fn default_redirect_port() -> u16 {
    8080
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

fn default_allowed_headers() -> Vec<String> {
    vec!["Content-Type".to_string()]
}

fn default_max_age() -> u64 {
    3600
}
