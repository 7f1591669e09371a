//! SplitWallet - shared-expense budgeting engine
//!
//! This library tracks a monthly allowance per user, records expenses paid
//! alone or split evenly across a group, raises near-limit and over-limit
//! alerts, and restores every balance at the start of each calendar month.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, groups, transactions, intents)
//! - `storage`: Store traits and their JSON file repositories
//! - `threshold`: Budget alert policy and its evaluators
//! - `ledger`: The engine and its injected collaborators
//! - `services`: Allocation, reset and notification logic
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use splitwallet::config::{LedgerPaths, Settings};
//! use splitwallet::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! let ledger = splitwallet::cli::open_ledger(&storage, &settings);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;
pub mod threshold;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use ledger::{EnginePolicy, Ledger, LedgerStores};
