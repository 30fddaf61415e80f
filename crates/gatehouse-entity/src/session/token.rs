//! Opaque session token.

use serde::{Deserialize, Serialize};

/// Opaque bearer token identifying a session. Carried in the session cookie.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters, safe to put in log lines.
    pub fn prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken({}…)", self.prefix())
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::new("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(token.prefix(), "abcdefgh");
        assert!(!format!("{token:?}").contains("ijklmnop"));
    }

    #[test]
    fn test_prefix_of_short_token() {
        assert_eq!(SessionToken::new("abc").prefix(), "abc");
    }
}
