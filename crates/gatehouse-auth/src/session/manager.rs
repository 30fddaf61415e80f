//! Session lifecycle: login, logout, and check flows.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use gatehouse_core::config::SessionConfig;
use gatehouse_core::result::AppResult;
use gatehouse_entity::account::Account;
use gatehouse_entity::permission::Permission;
use gatehouse_entity::session::{Session, SessionToken};

use crate::account::AccountStore;
use crate::authenticator::Authenticator;
use crate::rbac::RbacPolicies;

use super::store::SessionStore;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Token to hand back in the session cookie.
    pub token: SessionToken,
    /// The issued session.
    pub session: Session,
    /// The authenticated account.
    pub account: Account,
    /// Permissions of the account's role.
    pub permissions: Vec<Permission>,
}

/// A resolved, unexpired session with what the front-end needs to render.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// The session record.
    pub session: Session,
    /// Display name of the account, or the identity if the account is gone.
    pub display_name: String,
    /// Permissions of the role captured at login.
    pub permissions: Vec<Permission>,
}

/// Ties credential checks, session issuance, and role permissions together.
#[derive(Clone)]
pub struct SessionManager {
    authenticator: Authenticator,
    sessions: Arc<SessionStore>,
    accounts: Arc<AccountStore>,
    rbac: Arc<RbacPolicies>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        accounts: Arc<AccountStore>,
        sessions: Arc<SessionStore>,
        rbac: Arc<RbacPolicies>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            authenticator: Authenticator::new(Arc::clone(&accounts)),
            sessions,
            accounts,
            rbac,
            ttl: Duration::from_secs(config.ttl_seconds),
        }
    }

    /// Session lifetime, also used as the cookie `Max-Age`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Verifies credentials and issues a session.
    ///
    /// The session keeps the account's role as it is now; later role
    /// changes do not reach sessions that are already issued.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        let account = self.authenticator.authenticate(username, password).await?;

        let (token, session) = self
            .sessions
            .create(&account.username, account.role, self.ttl)
            .await?;

        let permissions = self.rbac.permissions_for(account.role).to_vec();

        info!(
            username = %account.username,
            role = %account.role,
            token = %token.prefix(),
            "User logged in"
        );

        Ok(LoginResult {
            token,
            session,
            account,
            permissions,
        })
    }

    /// Ends the session behind `token`, if any. Missing or unknown tokens
    /// succeed without doing anything.
    pub async fn logout(&self, token: Option<&str>) -> AppResult<()> {
        let Some(token) = token else {
            return Ok(());
        };

        if self.sessions.destroy(token).await? {
            info!("User logged out");
        }
        Ok(())
    }

    /// Resolves `token` without modifying anything except lazy eviction of
    /// an expired entry.
    pub async fn check(&self, token: Option<&str>) -> Option<ActiveSession> {
        let session = self.sessions.resolve(token?).await?;

        let display_name = self
            .accounts
            .find(&session.username)
            .await
            .map(|account| account.display_name().to_string())
            .unwrap_or_else(|| session.username.clone());
        let permissions = self.rbac.permissions_for(session.role).to_vec();

        Some(ActiveSession {
            session,
            display_name,
            permissions,
        })
    }
}
