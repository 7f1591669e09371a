//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json, with a version
//! check on every replace.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId};

use super::collection::{JsonCollection, Keyed};
use super::traits::AccountStore;

impl Keyed for Account {
    type Key = AccountId;

    fn key(&self) -> AccountId {
        self.id
    }
}

/// Repository for account persistence
pub struct AccountRepository {
    records: JsonCollection<Account>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            records: JsonCollection::new(path),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> LedgerResult<()> {
        self.records.load()
    }

    pub fn count(&self) -> LedgerResult<usize> {
        self.records.count()
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        self.records.get(id)
    }

    async fn insert(&self, account: Account) -> LedgerResult<()> {
        self.records.mutate(|data| {
            if data.contains_key(&account.id) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Account",
                    identifier: account.id.to_string(),
                });
            }

            let email = account.email.to_lowercase();
            if data.values().any(|a| a.email.to_lowercase() == email) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Account",
                    identifier: account.email.clone(),
                });
            }

            data.insert(account.id, account);
            Ok(())
        })
    }

    async fn replace(&self, mut account: Account, expected_version: u64) -> LedgerResult<Account> {
        self.records.mutate(|data| {
            let current = data
                .get(&account.id)
                .ok_or_else(|| LedgerError::account_not_found(account.id))?;

            if current.version != expected_version {
                return Err(LedgerError::PersistenceConflict {
                    account_id: account.id,
                    expected: expected_version,
                    found: current.version,
                });
            }

            account.version = expected_version + 1;
            data.insert(account.id, account.clone());
            Ok(account)
        })
    }

    async fn list_ids(&self) -> LedgerResult<Vec<AccountId>> {
        self.records.keys()
    }

    async fn find_by_email(&self, email: &str) -> LedgerResult<Option<Account>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .records
            .values()?
            .into_iter()
            .find(|a| a.email.to_lowercase() == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn account(email: &str) -> Account {
        Account::new("Test", email, Money::new(500.0), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let acc = account("a@example.com");
        let id = acc.id;

        repo.insert(acc).await.unwrap();

        let retrieved = repo.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved.email, "a@example.com");
        assert_eq!(retrieved.version, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(account("a@example.com")).await.unwrap();

        let err = repo.insert(account("A@Example.com")).await.unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_bumps_version() {
        let (_temp_dir, repo) = create_test_repo();
        let mut acc = account("a@example.com");
        repo.insert(acc.clone()).await.unwrap();

        acc.remaining = Money::new(100.0);
        let stored = repo.replace(acc, 0).await.unwrap();
        assert_eq!(stored.version, 1);

        let reread = repo.get(stored.id).await.unwrap().unwrap();
        assert_eq!(reread.remaining, Money::new(100.0));
        assert_eq!(reread.version, 1);
    }

    #[tokio::test]
    async fn test_stale_replace_conflicts() {
        let (_temp_dir, repo) = create_test_repo();
        let acc = account("a@example.com");
        repo.insert(acc.clone()).await.unwrap();

        let mut first = acc.clone();
        first.remaining = Money::new(400.0);
        repo.replace(first, 0).await.unwrap();

        let mut second = acc;
        second.remaining = Money::new(300.0);
        let err = repo.replace(second, 0).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::PersistenceConflict { expected: 0, found: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_replace_missing_account() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo.replace(account("a@example.com"), 0).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let acc = account("a@example.com");
        let id = acc.id;
        repo.insert(acc).await.unwrap();

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();
        assert!(repo2.get(id).await.unwrap().is_some());
        assert!(repo2.find_by_email(" A@EXAMPLE.COM ").await.unwrap().is_some());
    }
}
