//! Allocation application
//!
//! Debits every participant of an allocation intent. Each account is updated
//! on its own under its version token; there is no atomicity across
//! participants. Failures are collected rather than aborting the rest.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::LedgerResult;
use crate::ledger::{Change, Ledger};
use crate::models::{Account, AccountId, Alert, AllocationIntent, Money};
use crate::threshold::{self, ThresholdInput};

use super::allocator::Allocation;

/// Result of applying one intent
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// The payer's account after the update, if it succeeded
    pub payer: Option<Account>,
    /// Alert the payer was notified with, if the payer was updated
    pub payer_alert: Option<Alert>,
    /// Participants that could not be debited
    pub failed: Vec<AccountId>,
}

impl ApplyOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct AllocationApplier<'a> {
    ledger: &'a Ledger,
}

impl<'a> AllocationApplier<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Debit all participants of `intent`
    ///
    /// Accounts that already carry the intent ID are left alone, so applying
    /// the same intent twice is harmless. A participant whose balance is from
    /// an earlier month is reset before the debit. Only the payer receives the
    /// alert. If the payer's balance moved since the alert was evaluated, the
    /// alert is re-classified on the balance actually debited.
    pub async fn apply(&self, intent: &AllocationIntent, now: DateTime<Utc>) -> ApplyOutcome {
        let allocation = Allocation {
            participants: intent.transaction.participants.clone(),
            share: intent.transaction.share,
        };
        let payer = intent.transaction.payer;

        let results: Vec<(AccountId, LedgerResult<(Account, Option<Alert>)>)> =
            stream::iter(allocation.units())
                .map(|(account_id, occurrences)| async move {
                    let result = self.apply_one(intent, account_id, occurrences, now).await;
                    (account_id, result)
                })
                .buffer_unordered(self.ledger.policy.allocation_concurrency)
                .collect()
                .await;

        let mut outcome = ApplyOutcome::default();
        for (account_id, result) in results {
            match result {
                Ok((account, alert)) if account_id == payer => {
                    outcome.payer = Some(account);
                    outcome.payer_alert = alert;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        intent = %intent.id,
                        account = %account_id,
                        error = %err,
                        "Could not apply allocation to participant"
                    );
                    outcome.failed.push(account_id);
                }
            }
        }

        // Report failures in participant order
        let order = allocation.units();
        outcome
            .failed
            .sort_by_key(|id| order.iter().position(|(p, _)| p == id));
        outcome
    }

    async fn apply_one(
        &self,
        intent: &AllocationIntent,
        account_id: AccountId,
        occurrences: usize,
        now: DateTime<Utc>,
    ) -> LedgerResult<(Account, Option<Alert>)> {
        let deduction = intent.transaction.share.times(occurrences);
        let is_payer = account_id == intent.transaction.payer;

        self.ledger
            .modify_account(account_id, |account| {
                if account.has_applied(intent.id) {
                    return Ok(Change::Skip(intent.alert.clone()));
                }

                account.reset_if_due(now);
                let alert = if is_payer {
                    self.payer_alert(intent, account, deduction)?
                } else {
                    None
                };

                account.deduct(deduction, now);
                if let Some(alert) = &alert {
                    account.push_notification(alert, now);
                }
                account.record_applied(intent.id);
                Ok(Change::Write(alert))
            })
            .await
    }

    /// The payer's alert for a debit about to be applied to `account`
    fn payer_alert(
        &self,
        intent: &AllocationIntent,
        account: &Account,
        deduction: Money,
    ) -> LedgerResult<Option<Alert>> {
        match intent.evaluated_remaining {
            Some(evaluated) if evaluated != account.remaining => {
                tracing::debug!(
                    intent = %intent.id,
                    evaluated = %evaluated,
                    current = %account.remaining,
                    "Payer balance moved since evaluation, re-classifying"
                );
                let input =
                    ThresholdInput::new(deduction, account.monthly_allowance, account.remaining);
                threshold::classify(&input, self.ledger.policy.near_limit_percent)
            }
            _ => Ok(intent.alert.clone()),
        }
    }
}
