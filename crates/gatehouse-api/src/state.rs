//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gatehouse_auth::account::AccountStore;
use gatehouse_auth::rbac::RbacPolicies;
use gatehouse_auth::registration::RegistrationService;
use gatehouse_auth::session::{SessionManager, SessionStore};
use gatehouse_core::config::AppConfig;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::{Clock, DocumentStore};
use gatehouse_entity::account::{Account, UserRole};
use gatehouse_entity::session::Session;

use crate::middleware::gate::ProtectedPaths;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Compiled protected-path rules
    pub protected_paths: Arc<ProtectedPaths>,
    /// Role given to self-registered accounts
    pub default_role: UserRole,

    // ── Stores ───────────────────────────────────────────────
    /// Account table
    pub accounts: Arc<AccountStore>,
    /// Session table
    pub sessions: Arc<SessionStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Role-permission table
    pub rbac: Arc<RbacPolicies>,
    /// Login, logout, and check flows
    pub session_manager: Arc<SessionManager>,
    /// Self-registration
    pub registration: Arc<RegistrationService>,
}

impl AppState {
    /// Opens both stores on the given backends and wires the auth layer.
    pub async fn new(
        config: AppConfig,
        account_backend: Arc<dyn DocumentStore<Account>>,
        session_backend: Arc<dyn DocumentStore<Session>>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let default_role: UserRole = config.auth.default_role.parse()?;
        let rbac = Arc::new(RbacPolicies::from_config(&config.rbac)?);
        let protected_paths = Arc::new(ProtectedPaths::new(&config.gate.protected_paths));

        let accounts = Arc::new(AccountStore::open(account_backend, Arc::clone(&clock)).await?);
        let sessions = Arc::new(SessionStore::open(session_backend, clock).await?);

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&accounts),
            Arc::clone(&sessions),
            Arc::clone(&rbac),
            &config.session,
        ));

        let registration = Arc::new(RegistrationService::new(
            Arc::clone(&accounts),
            default_role,
        ));

        Ok(Self {
            config: Arc::new(config),
            protected_paths,
            default_role,
            accounts,
            sessions,
            rbac,
            session_manager,
            registration,
        })
    }
}
