//! Monthly reset
//!
//! Restores each account's remaining balance to its allowance once per
//! calendar month. Two paths trigger it: the scheduled sweep over every
//! account, and [`ResetScheduler::ensure_current`] on the first request that
//! touches an account in a new month. Both go through
//! [`Account::reset_if_due`], so a second trigger in the same month is a
//! no-op.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::LedgerResult;
use crate::ledger::{Change, Ledger};
use crate::models::{Account, AccountId};

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    /// Accounts whose balance was restored
    pub reset_count: usize,
    /// Accounts the sweep could not reset
    pub failures: Vec<AccountId>,
}

pub struct ResetScheduler<'a> {
    ledger: &'a Ledger,
}

impl<'a> ResetScheduler<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Return the account, resetting it first if its balance is from an
    /// earlier month
    pub async fn ensure_current(&self, id: AccountId, now: DateTime<Utc>) -> LedgerResult<Account> {
        let (account, _) = self.reset_one(id, now).await?;
        Ok(account)
    }

    async fn reset_one(&self, id: AccountId, now: DateTime<Utc>) -> LedgerResult<(Account, bool)> {
        self.ledger
            .modify_account(id, |account| {
                if account.reset_if_due(now) {
                    Ok(Change::Write(true))
                } else {
                    Ok(Change::Skip(false))
                }
            })
            .await
    }

    /// Sweep every account
    ///
    /// A failure on one account is logged and recorded in the report; the
    /// sweep carries on with the rest. Only failing to list the accounts
    /// aborts the sweep.
    pub async fn run_monthly_reset(&self, now: DateTime<Utc>) -> LedgerResult<ResetReport> {
        let ids = self.ledger.stores.accounts.list_ids().await?;

        let results: Vec<(AccountId, LedgerResult<bool>)> = stream::iter(ids)
            .map(|id| async move {
                let result = self.reset_one(id, now).await.map(|(_, reset)| reset);
                (id, result)
            })
            .buffer_unordered(self.ledger.policy.allocation_concurrency)
            .collect()
            .await;

        let mut report = ResetReport::default();
        for (id, result) in results {
            match result {
                Ok(true) => report.reset_count += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(account = %id, error = %err, "Monthly reset failed");
                    report.failures.push(id);
                }
            }
        }
        report.failures.sort();

        tracing::info!(
            reset = report.reset_count,
            failed = report.failures.len(),
            "Monthly reset sweep finished"
        );
        Ok(report)
    }

    /// Sweep on a fixed interval until the task is dropped
    pub async fn run_forever(&self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(err) = self.run_monthly_reset(self.ledger.now()).await {
                tracing::warn!(error = %err, "Monthly reset sweep could not run");
            }
        }
    }
}
