//! Session table keyed by opaque token.
//!
//! Every mutation runs under one lock: change the in-memory table, write
//! the whole table to the backend, release. A failed write undoes the
//! change, except for expiry evictions, which stay applied.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use gatehouse_core::result::AppResult;
use gatehouse_core::traits::{Clock, Document, DocumentStore};
use gatehouse_entity::account::UserRole;
use gatehouse_entity::session::{Session, SessionToken};

use super::token::generate_token;

/// Owns every live session.
pub struct SessionStore {
    sessions: Mutex<Document<Session>>,
    backend: Arc<dyn DocumentStore<Session>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.backend.location())
            .finish()
    }
}

impl SessionStore {
    /// Loads the session table from `backend`.
    pub async fn open(
        backend: Arc<dyn DocumentStore<Session>>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let sessions = backend.load().await?;
        info!(
            location = %backend.location(),
            count = sessions.len(),
            "Session table loaded"
        );

        Ok(Self {
            sessions: Mutex::new(sessions),
            backend,
            clock,
        })
    }

    /// Issues a session for `username` valid for `ttl`.
    ///
    /// The token never collides with a live one.
    pub async fn create(
        &self,
        username: &str,
        role: UserRole,
        ttl: Duration,
    ) -> AppResult<(SessionToken, Session)> {
        let now = self.clock.now();
        let session = Session {
            username: username.to_string(),
            role,
            created_at: now,
            expires_at: expiry(now, ttl),
        };

        let mut sessions = self.sessions.lock().await;
        let token = loop {
            let candidate = generate_token();
            if !sessions.contains_key(candidate.as_str()) {
                break candidate;
            }
        };
        sessions.insert(token.as_str().to_string(), session.clone());

        if let Err(e) = self.backend.save(&sessions).await {
            sessions.remove(token.as_str());
            error!(username = %username, error = %e, "Failed to persist new session");
            return Err(e);
        }

        debug!(
            username = %username,
            token = %token.prefix(),
            expires_at = %session.expires_at,
            "Session created"
        );
        Ok((token, session))
    }

    /// Returns the session for `token` if it exists and has not expired.
    ///
    /// An expired entry is removed as a side effect. Unknown and expired
    /// tokens are indistinguishable to the caller.
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get(token)?;

        if !session.is_expired_at(self.clock.now()) {
            return Some(session.clone());
        }

        if let Some(expired) = sessions.remove(token) {
            debug!(username = %expired.username, "Expired session evicted");
        }
        if let Err(e) = self.backend.save(&sessions).await {
            warn!(error = %e, "Failed to persist session eviction");
        }
        None
    }

    /// Removes the session for `token`. Returns whether one existed.
    ///
    /// Absent tokens are not an error.
    pub async fn destroy(&self, token: &str) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        let Some(removed) = sessions.remove(token) else {
            return Ok(false);
        };

        if let Err(e) = self.backend.save(&sessions).await {
            error!(username = %removed.username, error = %e, "Failed to persist logout");
            sessions.insert(token.to_string(), removed);
            return Err(e);
        }

        debug!(username = %removed.username, "Session destroyed");
        Ok(true)
    }

    /// Drops every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> AppResult<usize> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        let purged = before - sessions.len();

        if purged > 0 {
            self.backend.save(&sessions).await?;
        }
        Ok(purged)
    }

    /// Drops every session. Returns how many were removed.
    pub async fn reset(&self) -> AppResult<usize> {
        let mut sessions = self.sessions.lock().await;
        let previous = std::mem::take(&mut *sessions);

        if let Err(e) = self.backend.save(&sessions).await {
            *sessions = previous;
            return Err(e);
        }

        info!(count = previous.len(), "Session table reset");
        Ok(previous.len())
    }

    /// Number of stored sessions, expired ones not yet evicted included.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
