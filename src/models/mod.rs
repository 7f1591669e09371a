//! Core data models for SplitWallet
//!
//! This module contains the data structures of the budgeting domain:
//! accounts, groups, expenses, notifications and allocation intents.

pub mod account;
pub mod group;
pub mod ids;
pub mod intent;
pub mod money;
pub mod notification;
pub mod period;
pub mod transaction;

pub use account::Account;
pub use group::Group;
pub use ids::{AccountId, CategoryId, GroupId, IntentId, NotificationId, TransactionId};
pub use intent::{AllocationIntent, IntentStatus};
pub use money::Money;
pub use notification::{Alert, AlertKind, Notification};
pub use period::{is_reset_due, month_start, BudgetMonth};
pub use transaction::Transaction;
