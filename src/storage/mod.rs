//! Storage layer for SplitWallet
//!
//! Defines the collaborator traits the engine depends on and provides JSON
//! file repositories implementing them, with atomic writes and version
//! checks on account replacement.

pub mod accounts;
pub mod collection;
pub mod groups;
pub mod intents;
pub mod traits;
pub mod transactions;

pub use accounts::AccountRepository;
pub use groups::GroupRepository;
pub use intents::IntentRepository;
pub use traits::{AccountStore, GroupStore, IntentStore, TransactionStore};
pub use transactions::TransactionRepository;

use std::sync::Arc;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that owns every repository
pub struct Storage {
    paths: LedgerPaths,
    pub accounts: Arc<AccountRepository>,
    pub groups: Arc<GroupRepository>,
    pub transactions: Arc<TransactionRepository>,
    pub intents: Arc<IntentRepository>,
}

impl Storage {
    /// Create the directories and load every collection from disk
    pub fn open(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        let storage = Self {
            accounts: Arc::new(AccountRepository::new(paths.accounts_file())),
            groups: Arc::new(GroupRepository::new(paths.groups_file())),
            transactions: Arc::new(TransactionRepository::new(paths.transactions_file())),
            intents: Arc::new(IntentRepository::new(paths.intents_file())),
            paths,
        };

        storage.accounts.load()?;
        storage.groups.load()?;
        storage.transactions.load()?;
        storage.intents.load()?;

        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_open_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.accounts.count().unwrap(), 0);
    }
}
