//! Custom error types for SplitWallet
//!
//! This module defines the error hierarchy for the ledger engine using
//! thiserror. Every error carries an [`ErrorKind`] so callers can branch on a
//! stable classification instead of matching message text.

use serde::Serialize;
use thiserror::Error;

use crate::models::{AccountId, TransactionId};

/// Stable, machine-readable classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidBudget,
    ThresholdServiceUnavailable,
    PersistenceConflict,
    PartialAllocationFailure,
    Duplicate,
    Validation,
    Storage,
    Config,
}

/// The main error type for SplitWallet operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Non-positive allowance or malformed amount
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    /// The threshold evaluator failed or timed out
    #[error("Threshold service unavailable: {0}")]
    ThresholdServiceUnavailable(String),

    /// An account changed between read and write
    #[error("Concurrent update detected on account {account_id} (expected version {expected}, found {found})")]
    PersistenceConflict {
        account_id: AccountId,
        expected: u64,
        found: u64,
    },

    /// One or more participants could not be debited
    #[error("Allocation for transaction {transaction_id} failed for {} participant(s): {}", failed.len(), format_ids(failed))]
    PartialAllocationFailure {
        transaction_id: TransactionId,
        failed: Vec<AccountId>,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

fn format_ids(ids: &[AccountId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "not found" error for notifications
    pub fn notification_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Notification",
            identifier: identifier.to_string(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidBudget(_) => ErrorKind::InvalidBudget,
            Self::ThresholdServiceUnavailable(_) => ErrorKind::ThresholdServiceUnavailable,
            Self::PersistenceConflict { .. } => ErrorKind::PersistenceConflict,
            Self::PartialAllocationFailure { .. } => ErrorKind::PartialAllocationFailure,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) | Self::Json(_) | Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a concurrent-write conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::PersistenceConflict { .. })
    }

    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ThresholdServiceUnavailable(_) | Self::PersistenceConflict { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SplitWallet operations
pub type LedgerResult<T> = Result<T, LedgerError>;
