//! Allocation intents
//!
//! An intent is written before any account is touched and completed after
//! the transaction record is stored. An intent that never reaches
//! `Completed` marks an allocation that a recovery sweep must finish.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, IntentId};
use super::money::Money;
use super::notification::Alert;
use super::transaction::Transaction;

/// Lifecycle of an allocation intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    /// Written, participants not yet all debited
    #[default]
    Pending,
    /// Some participants could not be debited
    Partial,
    /// Every participant debited and the transaction recorded
    Completed,
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Partial => write!(f, "Partial"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Durable marker for an in-progress expense allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationIntent {
    pub id: IntentId,

    /// The transaction this allocation will record
    pub transaction: Transaction,

    /// Alert to attach to the payer, if any
    pub alert: Option<Alert>,

    /// Payer balance `alert` was classified against
    #[serde(default)]
    pub evaluated_remaining: Option<Money>,

    #[serde(default)]
    pub status: IntentStatus,

    /// Participants that could not be debited on the last attempt
    #[serde(default)]
    pub failed: Vec<AccountId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl AllocationIntent {
    pub fn new(transaction: Transaction, alert: Option<Alert>, now: DateTime<Utc>) -> Self {
        Self {
            id: IntentId::new(),
            transaction,
            alert,
            evaluated_remaining: None,
            status: IntentStatus::Pending,
            failed: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Remember the payer balance the alert was evaluated on
    pub fn evaluated_on(mut self, remaining: Money) -> Self {
        self.evaluated_remaining = Some(remaining);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.status == IntentStatus::Completed
    }

    /// Record the outcome of an apply attempt
    pub fn record_failures(&mut self, failed: Vec<AccountId>, now: DateTime<Utc>) {
        self.status = if failed.is_empty() {
            IntentStatus::Pending
        } else {
            IntentStatus::Partial
        };
        self.failed = failed;
        self.updated_at = now;
    }

    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = IntentStatus::Completed;
        self.failed.clear();
        self.updated_at = now;
    }
}
