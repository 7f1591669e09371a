//! Expense recording
//!
//! Ties the engine together for one expense:
//!
//! 1. bring the payer's balance into the current month
//! 2. resolve participants and shares
//! 3. evaluate the payer's threshold (fails before anything is debited)
//! 4. write an allocation intent
//! 5. debit every participant
//! 6. record the transaction
//! 7. drop the completed intent
//!
//! An intent left incomplete by a crash or a partial failure is finished by
//! [`ExpenseService::recover_incomplete`].

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{
    AccountId, Alert, AllocationIntent, CategoryId, GroupId, IntentId, Money, Transaction,
    TransactionId,
};
use crate::threshold::ThresholdInput;

use super::allocator::ExpenseAllocator;
use super::applier::{AllocationApplier, ApplyOutcome};
use super::recorder::TransactionRecorder;
use super::reset::ResetScheduler;

/// Input for recording an expense
#[derive(Debug, Clone)]
pub struct ExpenseRequest {
    pub payer: AccountId,
    pub description: String,
    pub amount: Money,
    pub category_id: CategoryId,
    pub group_id: Option<GroupId>,
}

/// What the caller gets back from a recorded expense
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReceipt {
    pub transaction_id: TransactionId,
    /// The payer's remaining balance after the deduction
    pub remaining_balance: Money,
    pub alert: Option<Alert>,
    pub share: Money,
    pub participants: usize,
}

/// Outcome of a recovery sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecoveryReport {
    pub completed: Vec<IntentId>,
    pub still_failing: Vec<(IntentId, Vec<AccountId>)>,
}

pub struct ExpenseService<'a> {
    ledger: &'a Ledger,
}

impl<'a> ExpenseService<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Record an expense
    ///
    /// # Errors
    ///
    /// - `NotFound` if the payer or group does not exist
    /// - `InvalidBudget` for a non-positive amount or allowance
    /// - `ThresholdServiceUnavailable` if the evaluator keeps failing; no
    ///   account has been debited in that case
    /// - `PartialAllocationFailure` if some participants could not be
    ///   debited; the transaction is still recorded
    pub async fn record_expense(&self, request: ExpenseRequest) -> LedgerResult<ExpenseReceipt> {
        let now = self.ledger.now();

        if request.description.trim().is_empty() {
            return Err(LedgerError::Validation(
                "expense description cannot be empty".into(),
            ));
        }

        let payer = ResetScheduler::new(self.ledger)
            .ensure_current(request.payer, now)
            .await?;

        let allocation = ExpenseAllocator::new(self.ledger)
            .allocate(request.payer, request.amount, request.group_id)
            .await?;

        let input = ThresholdInput::new(
            allocation.deduction_for(payer.id),
            payer.monthly_allowance,
            payer.remaining,
        );
        let alert = self.ledger.evaluator.evaluate(input).await?;

        let transaction = Transaction {
            id: TransactionId::new(),
            description: request.description.trim().to_string(),
            amount: request.amount,
            category_id: request.category_id,
            payer: payer.id,
            group_id: request.group_id,
            participants: allocation.participants,
            share: allocation.share,
            created_at: now,
        };

        let intent = AllocationIntent::new(transaction, alert, now).evaluated_on(payer.remaining);
        self.ledger.stores.intents.put(intent.clone()).await?;

        let (outcome, intent) = self.finish(intent).await?;
        let payer_account = outcome
            .payer
            .ok_or_else(|| LedgerError::account_not_found(request.payer))?;

        tracing::info!(
            transaction = %intent.transaction.id,
            payer = %payer_account.id,
            amount = %intent.transaction.amount,
            participants = intent.transaction.participants.len(),
            "Recorded expense"
        );

        Ok(ExpenseReceipt {
            transaction_id: intent.transaction.id,
            remaining_balance: payer_account.remaining,
            alert: intent.alert,
            share: intent.transaction.share,
            participants: intent.transaction.participants.len(),
        })
    }

    /// Transactions the account took part in, newest first
    pub async fn list_transactions(&self, account: AccountId) -> LedgerResult<Vec<Transaction>> {
        TransactionRecorder::new(self.ledger).history(account).await
    }

    /// Finish every intent that never completed
    pub async fn recover_incomplete(&self) -> LedgerResult<RecoveryReport> {
        let intents = self.ledger.stores.intents.list_incomplete().await?;
        let mut report = RecoveryReport::default();

        for intent in intents {
            let id = intent.id;
            tracing::info!(intent = %id, status = %intent.status, "Recovering allocation intent");

            match self.finish(intent).await {
                Ok(_) => report.completed.push(id),
                Err(LedgerError::PartialAllocationFailure { failed, .. }) => {
                    report.still_failing.push((id, failed))
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }

    /// Apply, record and complete an intent
    async fn finish(
        &self,
        mut intent: AllocationIntent,
    ) -> LedgerResult<(ApplyOutcome, AllocationIntent)> {
        let now = self.ledger.now();
        let outcome = AllocationApplier::new(self.ledger).apply(&intent, now).await;
        if outcome.payer.is_some() {
            intent.alert = outcome.payer_alert.clone();
        }
        intent.record_failures(outcome.failed.clone(), now);

        if let Err(err) = TransactionRecorder::new(self.ledger)
            .record(&intent.transaction)
            .await
        {
            self.save_intent(&intent).await;
            return Err(err);
        }

        if !outcome.is_complete() {
            tracing::warn!(
                intent = %intent.id,
                failed = outcome.failed.len(),
                "Allocation applied partially"
            );
            self.save_intent(&intent).await;
            return Err(LedgerError::PartialAllocationFailure {
                transaction_id: intent.transaction.id,
                failed: outcome.failed,
            });
        }

        intent.complete(now);
        if let Err(err) = self.ledger.stores.intents.remove(intent.id).await {
            // Finishing it again later is harmless
            tracing::warn!(intent = %intent.id, error = %err, "Could not drop completed intent");
        }
        Ok((outcome, intent))
    }

    async fn save_intent(&self, intent: &AllocationIntent) {
        if let Err(err) = self.ledger.stores.intents.put(intent.clone()).await {
            tracing::warn!(intent = %intent.id, error = %err, "Could not update allocation intent");
        }
    }
}
