//! Durable document locations.

use serde::{Deserialize, Serialize};

/// Locations of the two persisted documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON document mapping identity to account record.
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    /// JSON document mapping session token to session record.
    #[serde(default = "default_sessions_file")]
    pub sessions_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            accounts_file: default_accounts_file(),
            sessions_file: default_sessions_file(),
        }
    }
}

fn default_accounts_file() -> String {
    "data/users.json".to_string()
}

fn default_sessions_file() -> String {
    "data/sessions.json".to_string()
}
