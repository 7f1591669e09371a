//! The ledger engine and its injected collaborators
//!
//! A [`Ledger`] is built once at startup from explicit store handles and a
//! threshold evaluator, then shared by every request. It owns no mutable
//! state of its own: accounts, groups, transactions and intents all live in
//! the stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Notification, NotificationId};
use crate::services::{
    AccountService, ExpenseReceipt, ExpenseRequest, ExpenseService, GroupDirectory,
    NotificationService, ResetReport, ResetScheduler,
};
use crate::storage::{AccountStore, GroupStore, IntentStore, Storage, TransactionStore};
use crate::threshold::{BoundedEvaluator, ThresholdEvaluator};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Store handles the engine reads and writes through
#[derive(Clone)]
pub struct LedgerStores {
    pub accounts: Arc<dyn AccountStore>,
    pub groups: Arc<dyn GroupStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub intents: Arc<dyn IntentStore>,
}

impl From<&Storage> for LedgerStores {
    fn from(storage: &Storage) -> Self {
        Self {
            accounts: storage.accounts.clone(),
            groups: storage.groups.clone(),
            transactions: storage.transactions.clone(),
            intents: storage.intents.clone(),
        }
    }
}

/// Concurrency and retry bounds for the engine
#[derive(Debug, Clone, Copy)]
pub struct EnginePolicy {
    pub max_conflict_retries: u32,
    pub allocation_concurrency: usize,
    /// Used to re-classify a payer whose balance moved after evaluation
    pub near_limit_percent: f64,
}

impl From<&Settings> for EnginePolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            max_conflict_retries: settings.max_conflict_retries,
            allocation_concurrency: settings.allocation_concurrency.max(1),
            near_limit_percent: settings.near_limit_percent,
        }
    }
}

/// Expense allocation and budget consistency engine
#[derive(Clone)]
pub struct Ledger {
    pub(crate) stores: LedgerStores,
    pub(crate) evaluator: Arc<dyn ThresholdEvaluator>,
    pub(crate) policy: EnginePolicy,
    clock: Clock,
}

impl Ledger {
    /// Build a ledger; `evaluator` is wrapped with the configured timeout
    /// and retry policy
    pub fn new(
        stores: LedgerStores,
        evaluator: Arc<dyn ThresholdEvaluator>,
        settings: &Settings,
    ) -> Self {
        Self {
            stores,
            evaluator: Arc::new(BoundedEvaluator::new(evaluator, settings.threshold.clone())),
            policy: EnginePolicy::from(settings),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock, e.g. with a fixed instant in tests
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn stores(&self) -> &LedgerStores {
        &self.stores
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    pub fn groups(&self) -> GroupDirectory<'_> {
        GroupDirectory::new(self)
    }

    pub fn expenses(&self) -> ExpenseService<'_> {
        ExpenseService::new(self)
    }

    pub fn notifications(&self) -> NotificationService<'_> {
        NotificationService::new(self)
    }

    pub fn resets(&self) -> ResetScheduler<'_> {
        ResetScheduler::new(self)
    }

    /// Record an expense against the payer, or split it across a group
    pub async fn record_expense(&self, request: ExpenseRequest) -> LedgerResult<ExpenseReceipt> {
        self.expenses().record_expense(request).await
    }

    /// Notifications on an account, oldest first
    pub async fn list_notifications(&self, account: AccountId) -> LedgerResult<Vec<Notification>> {
        self.notifications().list(account).await
    }

    /// Mark one notification read; already-read notifications are a no-op
    pub async fn mark_notification_read(
        &self,
        account: AccountId,
        notification: &NotificationId,
    ) -> LedgerResult<()> {
        self.notifications().mark_read(account, notification).await
    }

    /// Reset every account whose balance belongs to an earlier month
    pub async fn run_monthly_reset(&self, now: DateTime<Utc>) -> LedgerResult<ResetReport> {
        self.resets().run_monthly_reset(now).await
    }

    /// Read-modify-write an account under its version token
    ///
    /// `change` runs against a fresh copy on every attempt. A conflict
    /// re-reads and re-applies, up to `max_conflict_retries` times.
    pub(crate) async fn modify_account<R>(
        &self,
        id: AccountId,
        mut change: impl FnMut(&mut Account) -> LedgerResult<Change<R>>,
    ) -> LedgerResult<(Account, R)> {
        let mut attempt = 0;
        loop {
            let mut account = self
                .stores
                .accounts
                .get(id)
                .await?
                .ok_or_else(|| LedgerError::account_not_found(id))?;
            let version = account.version;

            let value = match change(&mut account)? {
                Change::Skip(value) => return Ok((account, value)),
                Change::Write(value) => value,
            };

            match self.stores.accounts.replace(account, version).await {
                Ok(stored) => return Ok((stored, value)),
                Err(err) if err.is_conflict() && attempt < self.policy.max_conflict_retries => {
                    attempt += 1;
                    tracing::debug!(account = %id, attempt, "Retrying after concurrent update");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// What [`Ledger::modify_account`] should do with the changed copy
pub(crate) enum Change<R> {
    /// Persist the account
    Write(R),
    /// Nothing changed; skip the write
    Skip(R),
}
