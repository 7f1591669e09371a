//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger state for terminal display as
//! plain aligned tables and detail views.

pub mod account;
pub mod notification;
pub mod transaction;

pub use account::{format_account_details, format_account_list, format_group_details};
pub use notification::format_notification_list;
pub use transaction::{format_receipt, format_reset_report, format_transaction_list};
