//! Account table owned by the process and persisted whole on every change.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::{Clock, Document, DocumentStore};
use gatehouse_entity::account::{Account, AccountProfile, UserRole};

use crate::password::PasswordHasher;

/// Message returned for every failed verification.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Secret behind the digest checked for unknown identities.
const ABSENT_ACCOUNT_SECRET: &str = "gatehouse-absent-account";

/// Owns all accounts, keyed by identity.
pub struct AccountStore {
    accounts: Mutex<Document<Account>>,
    backend: Arc<dyn DocumentStore<Account>>,
    hasher: PasswordHasher,
    /// Verified against when the identity does not exist, so both failures
    /// cost one Argon2 run.
    absent_hash: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("backend", &self.backend.location())
            .finish()
    }
}

impl AccountStore {
    /// Loads the account table from `backend`.
    pub async fn open(
        backend: Arc<dyn DocumentStore<Account>>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let accounts = backend.load().await?;
        info!(
            location = %backend.location(),
            count = accounts.len(),
            "Account table loaded"
        );

        let hasher = PasswordHasher::new();
        let absent_hash = hasher.hash_password(ABSENT_ACCOUNT_SECRET)?;

        Ok(Self {
            accounts: Mutex::new(accounts),
            backend,
            hasher,
            absent_hash,
            clock,
        })
    }

    /// Creates an account.
    ///
    /// Fails with a conflict when the identity exists; the table is left
    /// untouched in that case. The new table is persisted before returning.
    /// If persisting fails the insert is undone and the storage error
    /// is returned.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
        profile: AccountProfile,
    ) -> AppResult<Account> {
        let password_hash = self.hasher.hash_password(password)?;

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(username) {
            debug!(username = %username, "Account creation rejected: identity taken");
            return Err(AppError::conflict("Username already exists"));
        }

        let account = Account {
            username: username.to_string(),
            password_hash,
            role,
            name: profile.name,
            email: profile.email,
            created_at: self.clock.now(),
        };
        accounts.insert(username.to_string(), account.clone());

        if let Err(e) = self.backend.save(&accounts).await {
            accounts.remove(username);
            error!(
                username = %username,
                location = %self.backend.location(),
                error = %e,
                "Failed to persist new account"
            );
            return Err(e);
        }

        info!(username = %username, role = %role, "Account created");
        Ok(account)
    }

    /// Returns the account when `password` matches its digest.
    ///
    /// Unknown identities and wrong secrets fail the same way, and both run
    /// a full digest verification.
    pub async fn verify(&self, username: &str, password: &str) -> AppResult<Account> {
        let Some(account) = self.find(username).await else {
            let _ = self.hasher.verify_password(password, &self.absent_hash);
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        match self.hasher.verify_password(password, &account.password_hash) {
            Ok(true) => Ok(account),
            Ok(false) => Err(AppError::authentication(INVALID_CREDENTIALS)),
            Err(e) => {
                warn!(username = %username, error = %e, "Stored digest is unusable");
                Err(AppError::authentication(INVALID_CREDENTIALS))
            }
        }
    }

    /// Looks up an account by identity.
    pub async fn find(&self, username: &str) -> Option<Account> {
        self.accounts.lock().await.get(username).cloned()
    }

    /// Whether the identity exists.
    pub async fn contains(&self, username: &str) -> bool {
        self.accounts.lock().await.contains_key(username)
    }

    /// Number of accounts.
    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    /// Whether there are no accounts.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::error::ErrorKind;
    use gatehouse_core::traits::SystemClock;
    use gatehouse_store::{JsonFileStore, MemoryStore};

    async fn store_with(backend: Arc<MemoryStore<Account>>) -> AccountStore {
        AccountStore::open(backend, Arc::new(SystemClock)).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_identity_is_rejected() {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(backend.clone()).await;

        store
            .create_account("alice", "secret123", UserRole::Viewer, AccountProfile::default())
            .await
            .unwrap();
        let err = store
            .create_account("alice", "other-secret", UserRole::Admin, AccountProfile::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.find("alice").await.unwrap().role, UserRole::Viewer);
        assert_eq!(backend.save_count(), 1);
    }

    #[tokio::test]
    async fn test_verify_after_create() {
        let store = store_with(Arc::new(MemoryStore::new())).await;
        let profile = AccountProfile {
            name: Some("Alice".to_string()),
            email: Some("alice@example.com".to_string()),
        };
        store
            .create_account("alice", "secret123", UserRole::Analyst, profile)
            .await
            .unwrap();

        let account = store.verify("alice", "secret123").await.unwrap();
        assert_eq!(account.display_name(), "Alice");
        assert_eq!(account.role, UserRole::Analyst);
    }

    #[tokio::test]
    async fn test_wrong_secret_and_unknown_identity_look_the_same() {
        let store = store_with(Arc::new(MemoryStore::new())).await;
        store
            .create_account("alice", "secret123", UserRole::Viewer, AccountProfile::default())
            .await
            .unwrap();

        let wrong = store.verify("alice", "secret124").await.unwrap_err();
        let unknown = store.verify("mallory", "secret123").await.unwrap_err();

        assert_eq!(wrong.kind, ErrorKind::Authentication);
        assert_eq!(unknown.kind, ErrorKind::Authentication);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn test_unknown_identity_checks_a_real_digest() {
        let store = store_with(Arc::new(MemoryStore::new())).await;

        assert!(store.absent_hash.starts_with("$argon2id$"));
        assert!(!store.hasher.verify_password("secret123", &store.absent_hash).unwrap());

        let err = store
            .verify("nobody", ABSENT_ACCOUNT_SECRET)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_insert() {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(backend.clone()).await;
        backend.set_fail_writes(true);

        let err = store
            .create_account("alice", "secret123", UserRole::Viewer, AccountProfile::default())
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert!(!store.contains("alice").await);

        backend.set_fail_writes(false);
        store
            .create_account("alice", "secret123", UserRole::Viewer, AccountProfile::default())
            .await
            .unwrap();
        assert!(store.contains("alice").await);
    }

    #[tokio::test]
    async fn test_accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let store = AccountStore::open(
            Arc::new(JsonFileStore::<Account>::new(&path)),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();
        store
            .create_account("alice", "secret123", UserRole::Viewer, AccountProfile::default())
            .await
            .unwrap();
        drop(store);

        let reopened = AccountStore::open(
            Arc::new(JsonFileStore::<Account>::new(&path)),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();
        assert_eq!(reopened.len().await, 1);
        assert!(reopened.verify("alice", "secret123").await.is_ok());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret123"));
    }
}
