//! Service layer for SplitWallet
//!
//! Each service borrows the [`Ledger`](crate::ledger::Ledger) and implements
//! one slice of the engine on top of its stores.

pub mod account;
pub mod allocator;
pub mod applier;
pub mod expense;
pub mod group;
pub mod notification;
pub mod recorder;
pub mod reset;

pub use account::{AccountService, AccountSummary};
pub use allocator::{split_evenly, Allocation, ExpenseAllocator};
pub use applier::{AllocationApplier, ApplyOutcome};
pub use expense::{ExpenseReceipt, ExpenseRequest, ExpenseService, RecoveryReport};
pub use group::GroupDirectory;
pub use notification::NotificationService;
pub use recorder::TransactionRecorder;
pub use reset::{ResetReport, ResetScheduler};
