//! Self-registration of new accounts.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_entity::account::{Account, AccountProfile, UserRole};

use crate::account::AccountStore;

/// Minimum identity length accepted at registration.
pub const MIN_USERNAME_LENGTH: u64 = 3;
/// Minimum secret length accepted at registration.
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Fields checked before an account is created. Lengths count characters.
#[derive(Validate)]
struct RegistrationInput {
    #[validate(length(min = MIN_USERNAME_LENGTH))]
    username: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    password: String,
}

/// Creates accounts on behalf of anonymous callers.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    accounts: Arc<AccountStore>,
    default_role: UserRole,
}

impl RegistrationService {
    /// Creates a registration service granting `default_role` to new accounts.
    pub fn new(accounts: Arc<AccountStore>, default_role: UserRole) -> Self {
        Self {
            accounts,
            default_role,
        }
    }

    /// Validates the input and creates the account.
    ///
    /// The identity is checked before the secret, and a rejected input
    /// never reaches the account table.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> AppResult<Account> {
        validate_registration(username, password)?;

        let profile = AccountProfile {
            name: None,
            email: email.filter(|e| !e.is_empty()).map(str::to_string),
        };
        let account = self
            .accounts
            .create_account(username, password, self.default_role, profile)
            .await?;

        info!(username = %account.username, "Account registered");
        Ok(account)
    }
}

/// Checks the length rules for a registration. Only the first violated
/// rule is reported, identity before secret.
pub fn validate_registration(username: &str, password: &str) -> AppResult<()> {
    let input = RegistrationInput {
        username: username.to_string(),
        password: password.to_string(),
    };
    let Err(errors) = input.validate() else {
        return Ok(());
    };

    let message = if errors.field_errors().contains_key("username") {
        format!("Username must be at least {MIN_USERNAME_LENGTH} characters")
    } else {
        format!("Password must be at least {MIN_PASSWORD_LENGTH} characters")
    };
    Err(AppError::validation(message))
}
