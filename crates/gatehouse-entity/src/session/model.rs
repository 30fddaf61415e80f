//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::UserRole;

/// A live session, keyed by its token in the session document.
///
/// Sessions are never edited after issue. `role` is the account's role at
/// login time; a later role change is only seen by sessions created after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The account this session authenticates.
    pub username: String,
    /// Role snapshot taken at login.
    pub role: UserRole,
    /// When the session was issued.
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is no longer valid at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
