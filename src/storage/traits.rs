//! Collaborator interfaces consumed by the ledger engine
//!
//! The engine only talks to these traits. The JSON repositories in this
//! module implement them; tests substitute their own doubles.

use async_trait::async_trait;

use crate::error::LedgerResult;
use crate::models::{
    Account, AccountId, AllocationIntent, Group, GroupId, IntentId, Transaction, TransactionId,
};

/// Durable per-user budget accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, id: AccountId) -> LedgerResult<Option<Account>>;

    /// Store a new account. Fails with `Duplicate` if the ID or email exists.
    async fn insert(&self, account: Account) -> LedgerResult<()>;

    /// Replace an account if its stored version still equals `expected_version`
    ///
    /// Returns the account as stored, with its version bumped. Fails with
    /// `PersistenceConflict` when another writer got there first and with
    /// `NotFound` when the account does not exist.
    async fn replace(&self, account: Account, expected_version: u64) -> LedgerResult<Account>;

    async fn list_ids(&self) -> LedgerResult<Vec<AccountId>>;

    async fn find_by_email(&self, email: &str) -> LedgerResult<Option<Account>>;
}

/// Read access to group membership
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn get(&self, id: GroupId) -> LedgerResult<Option<Group>>;

    async fn insert(&self, group: Group) -> LedgerResult<()>;
}

/// Append-only transaction log
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Store a new transaction. Fails with `Duplicate` if the ID exists.
    async fn create(&self, transaction: Transaction) -> LedgerResult<()>;

    async fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>>;

    /// Transactions the account took part in, newest first
    async fn list_for_account(&self, account: AccountId) -> LedgerResult<Vec<Transaction>>;
}

/// Durable allocation intents
#[async_trait]
pub trait IntentStore: Send + Sync {
    /// Insert or overwrite an intent
    async fn put(&self, intent: AllocationIntent) -> LedgerResult<()>;

    async fn get(&self, id: IntentId) -> LedgerResult<Option<AllocationIntent>>;

    /// Intents not yet completed, oldest first
    async fn list_incomplete(&self) -> LedgerResult<Vec<AllocationIntent>>;

    /// Drop a finished intent; removing an unknown ID is not an error
    async fn remove(&self, id: IntentId) -> LedgerResult<()>;
}
