//! Startup seeding of default accounts.

use tracing::{debug, info};

use gatehouse_core::config::SeedAccount;
use gatehouse_core::error::ErrorKind;
use gatehouse_core::result::AppResult;
use gatehouse_entity::account::{AccountProfile, UserRole};

use crate::account::AccountStore;

/// Creates each seed account whose identity is not present yet.
///
/// Existing accounts are left exactly as they are, so running this on
/// every start is safe. Returns the number of accounts created.
pub async fn seed_default_accounts(
    accounts: &AccountStore,
    seeds: &[SeedAccount],
    default_role: UserRole,
) -> AppResult<usize> {
    let mut created = 0;

    for seed in seeds {
        if accounts.contains(&seed.username).await {
            debug!(username = %seed.username, "Default account already present");
            continue;
        }

        let role = match &seed.role {
            Some(name) => name.parse()?,
            None => default_role,
        };
        let profile = AccountProfile {
            name: seed.name.clone(),
            email: seed.email.clone(),
        };

        match accounts
            .create_account(&seed.username, &seed.password, role, profile)
            .await
        {
            Ok(_) => created += 1,
            Err(e) if e.kind == ErrorKind::Conflict => {}
            Err(e) => return Err(e),
        }
    }

    if created > 0 {
        info!(created = created, "Default accounts created");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gatehouse_core::traits::SystemClock;
    use gatehouse_entity::account::Account;
    use gatehouse_store::MemoryStore;

    fn seed(username: &str, password: &str, role: Option<&str>) -> SeedAccount {
        SeedAccount {
            username: username.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
            name: None,
            email: Some(format!("{username}@example.com")),
        }
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let accounts = AccountStore::open(
            Arc::new(MemoryStore::<Account>::new()),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();
        let seeds = vec![
            seed("admin", "admin123", Some("admin")),
            seed("demo", "demo123", None),
        ];

        assert_eq!(
            seed_default_accounts(&accounts, &seeds, UserRole::Viewer).await.unwrap(),
            2
        );
        assert_eq!(
            seed_default_accounts(&accounts, &seeds, UserRole::Viewer).await.unwrap(),
            0
        );

        assert_eq!(accounts.find("admin").await.unwrap().role, UserRole::Admin);
        assert_eq!(accounts.find("demo").await.unwrap().role, UserRole::Viewer);
    }

    #[tokio::test]
    async fn test_existing_account_keeps_its_secret() {
        let accounts = AccountStore::open(
            Arc::new(MemoryStore::<Account>::new()),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();
        accounts
            .create_account("admin", "changed-later", UserRole::Admin, AccountProfile::default())
            .await
            .unwrap();

        seed_default_accounts(&accounts, &[seed("admin", "admin123", Some("admin"))], UserRole::Viewer)
            .await
            .unwrap();
        assert!(accounts.verify("admin", "changed-later").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_seed_role_fails() {
        let accounts = AccountStore::open(
            Arc::new(MemoryStore::<Account>::new()),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();
        let result =
            seed_default_accounts(&accounts, &[seed("x", "secret1", Some("root"))], UserRole::Viewer).await;
        assert!(result.is_err());
    }
}
