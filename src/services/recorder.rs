//! Transaction recording

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{AccountId, Transaction};

pub struct TransactionRecorder<'a> {
    ledger: &'a Ledger,
}

impl<'a> TransactionRecorder<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Persist a transaction record
    ///
    /// A record that already exists is left as it is and counts as success,
    /// so recovery can call this for intents that got this far before.
    pub async fn record(&self, transaction: &Transaction) -> LedgerResult<()> {
        match self
            .ledger
            .stores
            .transactions
            .create(transaction.clone())
            .await
        {
            Ok(()) | Err(LedgerError::Duplicate { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Transactions the account took part in, newest first
    pub async fn history(&self, account: AccountId) -> LedgerResult<Vec<Transaction>> {
        self.ledger
            .stores
            .transactions
            .list_for_account(account)
            .await
    }
}
