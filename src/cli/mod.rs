//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the ledger services.

pub mod account;
pub mod expense;
pub mod group;
pub mod notification;
pub mod reset;

pub use account::{handle_account_command, AccountCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use group::{handle_group_command, GroupCommands};
pub use notification::{handle_notification_command, NotificationCommands};
pub use reset::{handle_reset_command, ResetCommands};

use std::sync::Arc;

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Ledger, LedgerStores};
use crate::models::{Account, Money};
use crate::storage::Storage;
use crate::threshold::{HttpThresholdEvaluator, LocalThresholdEvaluator, ThresholdEvaluator};

/// Build the ledger over opened storage
///
/// Uses the remote threshold evaluator when an endpoint is configured and the
/// in-process one otherwise.
pub fn open_ledger(storage: &Storage, settings: &Settings) -> Ledger {
    let evaluator: Arc<dyn ThresholdEvaluator> = match &settings.threshold.endpoint {
        Some(endpoint) => {
            tracing::debug!(endpoint = %endpoint, "Using remote threshold evaluator");
            Arc::new(HttpThresholdEvaluator::new(endpoint.clone()))
        }
        None => Arc::new(LocalThresholdEvaluator::new(settings.near_limit_percent)),
    };

    Ledger::new(LedgerStores::from(storage), evaluator, settings)
}

/// Parse a money argument from the command line
pub(crate) fn parse_money(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use format like '25.00' or '25'. Error: {}",
            input, e
        ))
    })
}

/// Resolve an account by ID or email
pub(crate) async fn find_account(ledger: &Ledger, identifier: &str) -> LedgerResult<Account> {
    ledger.accounts().find(identifier).await
}
