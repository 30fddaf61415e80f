//! JSON bodies returned by the auth and health endpoints.

use serde::{Deserialize, Serialize};

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    /// Successful response carrying `message`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Public profile of an authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity
    pub id: String,
    /// Display name
    pub name: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub user: UserProfile,
}

/// Session check response. Only `authenticated` is present when there is
/// no valid session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl CheckResponse {
    /// Response for a request without a valid session.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Sessions currently held, expired ones not yet evicted included
    pub sessions: usize,
}
