//! Default accounts seeded at startup.

use serde::{Deserialize, Serialize};

/// Startup seeding configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Accounts created when their identity is not already present.
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
}

/// One default account.
#[derive(Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    /// Identity.
    pub username: String,
    /// Plaintext secret, hashed before it is stored.
    pub password: String,
    /// Role name; the configured default role when absent.
    #[serde(default)]
    pub role: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
