//! Configuration module for SplitWallet
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Engine settings persistence (thresholds, retries, scheduler interval)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{Settings, ThresholdSettings};
