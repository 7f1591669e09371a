//! Account service
//!
//! Registration and lookup of budget accounts.

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{Account, AccountId, Money};

use super::reset::ResetScheduler;

/// Service for account management
pub struct AccountService<'a> {
    ledger: &'a Ledger,
}

/// An account with its computed figures
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account: Account,
    /// Share of the allowance spent this month
    pub percent_spent: f64,
    /// Notifications not yet read
    pub unread: usize,
}

impl<'a> AccountService<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Register a new account with a full balance
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        monthly_allowance: Money,
    ) -> LedgerResult<Account> {
        if !monthly_allowance.is_valid_positive() {
            return Err(LedgerError::InvalidBudget(format!(
                "monthly allowance must be positive, got {}",
                monthly_allowance.value()
            )));
        }

        let account = Account::new(
            name.trim(),
            email.trim().to_lowercase(),
            monthly_allowance,
            self.ledger.now(),
        );
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.ledger.stores.accounts.insert(account.clone()).await?;

        tracing::info!(account = %account.id, name = %account.name, "Registered account");
        Ok(account)
    }

    /// Get an account, reset to the current month if due
    pub async fn get(&self, id: AccountId) -> LedgerResult<Account> {
        ResetScheduler::new(self.ledger)
            .ensure_current(id, self.ledger.now())
            .await
    }

    /// Find an account by ID or email
    pub async fn find(&self, identifier: &str) -> LedgerResult<Account> {
        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.get(id).await;
        }

        let account = self
            .ledger
            .stores
            .accounts
            .find_by_email(identifier.trim())
            .await?
            .ok_or_else(|| LedgerError::account_not_found(identifier))?;
        self.get(account.id).await
    }

    /// Account with its computed figures
    pub async fn summary(&self, id: AccountId) -> LedgerResult<AccountSummary> {
        let account = self.get(id).await?;
        Ok(AccountSummary {
            percent_spent: account.percent_spent().unwrap_or_default(),
            unread: account.unread_count(),
            account,
        })
    }

    /// All accounts, sorted by name
    pub async fn list(&self) -> LedgerResult<Vec<Account>> {
        let ids = self.ledger.stores.accounts.list_ids().await?;
        let mut accounts = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(account) = self.ledger.stores.accounts.get(id).await? {
                accounts.push(account);
            }
        }
        accounts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(accounts)
    }
}
