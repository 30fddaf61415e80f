//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::UserRole;

/// A registered account, keyed by `username` in the account document.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identity. Never changes after creation.
    pub username: String,
    /// PHC-formatted Argon2id digest of the secret.
    pub password_hash: String,
    /// Authorization tier.
    #[serde(default)]
    pub role: UserRole,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Informational profile fields supplied at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Display name.
    pub name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
}

impl Account {
    /// Name shown to users, falling back to the identity.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_defaults_to_viewer() {
        let json = r#"{
            "username": "demo",
            "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            "email": "demo@example.com",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.role, UserRole::Viewer);
        assert_eq!(account.display_name(), "demo");
    }

    #[test]
    fn test_debug_omits_digest() {
        let account = Account {
            username: "alice".to_string(),
            password_hash: "$argon2id$secret-digest".to_string(),
            role: UserRole::Analyst,
            name: Some("Alice".to_string()),
            email: None,
            created_at: Utc::now(),
        };
        assert!(!format!("{account:?}").contains("secret-digest"));
    }
}
