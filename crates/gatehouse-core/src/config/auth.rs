//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Account and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether `POST /auth/register` is exposed.
    #[serde(default = "default_true")]
    pub self_registration: bool,
    /// Role assigned to accounts created without an explicit role.
    #[serde(default = "default_role")]
    pub default_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            self_registration: true,
            default_role: default_role(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_role() -> String {
    "viewer".to_string()
}
