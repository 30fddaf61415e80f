//! Form bodies accepted by the auth endpoints.
//!
//! Missing fields default to empty strings instead of rejecting the request.

use serde::Deserialize;

/// POST /auth/login
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Identity
    pub username: String,
    /// Secret
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// POST /auth/register
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    /// Identity
    pub username: String,
    /// Secret
    pub password: String,
    /// Optional contact address
    pub email: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let req = LoginRequest {
            username: "alice".to_string(),
            password: "secret123".to_string(),
        };
        let debug = format!("{req:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret123"));
    }
}
