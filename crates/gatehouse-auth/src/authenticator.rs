//! Identity + secret verification for the login flow.

use std::sync::Arc;

use tracing::{info, warn};

use gatehouse_core::result::AppResult;
use gatehouse_entity::account::Account;

use crate::account::AccountStore;

/// Checks presented credentials against the account table.
#[derive(Debug, Clone)]
pub struct Authenticator {
    accounts: Arc<AccountStore>,
}

impl Authenticator {
    /// Creates an authenticator over `accounts`.
    pub fn new(accounts: Arc<AccountStore>) -> Self {
        Self { accounts }
    }

    /// Returns the matching account or an authentication error that does
    /// not say which half of the pair was wrong.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account> {
        match self.accounts.verify(username, password).await {
            Ok(account) => {
                info!(username = %account.username, role = %account.role, "Credentials accepted");
                Ok(account)
            }
            Err(e) => {
                warn!(username = %username, "Credentials rejected");
                Err(e)
            }
        }
    }
}
