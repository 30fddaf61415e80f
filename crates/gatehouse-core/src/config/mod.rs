//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so a missing file still
//! yields a runnable configuration.

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod gate;
pub mod logging;
pub mod rbac;
pub mod session;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig, TlsConfig};
pub use self::auth::AuthConfig;
pub use self::bootstrap::{BootstrapConfig, SeedAccount};
pub use self::gate::GateConfig;
pub use self::logging::LoggingConfig;
pub use self::rbac::RbacConfig;
pub use self::session::SessionConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides, e.g. `GATEHOUSE__SERVER__PORT`.
pub const ENV_PREFIX: &str = "GATEHOUSE";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Account settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Request gate settings.
    #[serde(default)]
    pub gate: GateConfig,
    /// Persisted document locations.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Role-permission overrides.
    #[serde(default)]
    pub rbac: RbacConfig,
    /// Default accounts.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with `GATEHOUSE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_runnable() {
        let config = AppConfig::default();
        assert_eq!(config.session.ttl_seconds, 86_400);
        assert_eq!(config.session.cookie_name, "session_id");
        assert_eq!(config.gate.login_path, "/login.html");
        assert!(!config.server.tls.enabled);
        assert!(config.auth.self_registration);
    }

    #[test]
    fn test_load_merges_environment_overlay() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[session]\nttl_seconds = 60\n[gate]\nprotected_paths = [\"/dashboard.html\"]\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("secure.toml"),
            "[server.tls]\nenabled = true\n[auth]\nself_registration = false\n",
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path().to_str().unwrap(), "secure").unwrap();
        assert_eq!(config.session.ttl_seconds, 60);
        assert_eq!(config.gate.protected_paths, vec!["/dashboard.html"]);
        assert!(config.server.tls.enabled);
        assert!(!config.auth.self_registration);
        assert_eq!(config.server.tls.redirect_port, 8080);
    }

    #[test]
    fn test_missing_directory_yields_defaults() {
        let config = AppConfig::load_from("does/not/exist", "nowhere").unwrap();
        assert_eq!(config.storage.accounts_file, "data/users.json");
    }
}
