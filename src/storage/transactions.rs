//! Transaction repository for JSON storage
//!
//! Transactions are write-once: there is no update or delete.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Transaction, TransactionId};

use super::collection::{JsonCollection, Keyed};
use super::traits::TransactionStore;

impl Keyed for Transaction {
    type Key = TransactionId;

    fn key(&self) -> TransactionId {
        self.id
    }
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    records: JsonCollection<Transaction>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            records: JsonCollection::new(path),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        self.records.load()
    }

    pub fn count(&self) -> LedgerResult<usize> {
        self.records.count()
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn create(&self, transaction: Transaction) -> LedgerResult<()> {
        self.records.mutate(|data| {
            if data.contains_key(&transaction.id) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Transaction",
                    identifier: transaction.id.to_string(),
                });
            }
            data.insert(transaction.id, transaction);
            Ok(())
        })
    }

    async fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.records.get(id)
    }

    async fn list_for_account(&self, account: AccountId) -> LedgerResult<Vec<Transaction>> {
        let mut transactions: Vec<_> = self
            .records
            .values()?
            .into_iter()
            .filter(|t| t.involves(account))
            .collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }
}
