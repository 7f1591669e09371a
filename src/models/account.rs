//! Account model
//!
//! One budget account per user: a fixed monthly allowance, the running
//! remaining balance, and the notifications raised against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, GroupId, IntentId, NotificationId};
use super::money::Money;
use super::notification::{Alert, Notification};
use super::period::{is_reset_due, BudgetMonth};

/// How many applied allocation intents an account remembers
pub const APPLIED_INTENT_WINDOW: usize = 256;

/// A user's budget account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display name
    pub name: String,

    /// Contact email, unique across accounts
    pub email: String,

    /// Fixed monthly budget ceiling
    pub monthly_allowance: Money,

    /// Allowance minus deductions since the last reset; may go negative
    pub remaining: Money,

    /// When the balance was last restored to the allowance
    pub last_reset: DateTime<Utc>,

    /// Alerts raised for this account, in insertion order
    #[serde(default)]
    pub notifications: Vec<Notification>,

    /// Groups this account belongs to
    #[serde(default)]
    pub groups: Vec<GroupId>,

    /// Allocation intents already applied to this account, most recent last
    #[serde(default)]
    pub applied_intents: Vec<IntentId>,

    /// Optimistic-concurrency token, bumped by the store on every replace
    #[serde(default)]
    pub version: u64,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a full balance
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        monthly_allowance: Money,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            email: email.into(),
            monthly_allowance,
            remaining: monthly_allowance,
            last_reset: now,
            notifications: Vec::new(),
            groups: Vec::new(),
            applied_intents: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount spent since the last reset
    pub fn spent(&self) -> Money {
        self.monthly_allowance - self.remaining
    }

    /// Percentage of the allowance spent, if the allowance is positive
    pub fn percent_spent(&self) -> Option<f64> {
        if !self.monthly_allowance.is_valid_positive() {
            return None;
        }
        Some(self.spent().value() / self.monthly_allowance.value() * 100.0)
    }

    /// Subtract a share from the remaining balance
    pub fn deduct(&mut self, share: Money, now: DateTime<Utc>) {
        self.remaining -= share;
        self.updated_at = now;
    }

    /// Whether this allocation intent has already been applied here
    pub fn has_applied(&self, intent: IntentId) -> bool {
        self.applied_intents.contains(&intent)
    }

    /// Remember an applied intent, keeping only the most recent window
    pub fn record_applied(&mut self, intent: IntentId) {
        self.applied_intents.push(intent);
        if self.applied_intents.len() > APPLIED_INTENT_WINDOW {
            let excess = self.applied_intents.len() - APPLIED_INTENT_WINDOW;
            self.applied_intents.drain(..excess);
        }
    }

    /// Month the balance currently belongs to
    pub fn budget_month(&self) -> BudgetMonth {
        BudgetMonth::containing(self.last_reset)
    }

    /// Whether a monthly reset is due at `now`
    pub fn is_reset_due(&self, now: DateTime<Utc>) -> bool {
        is_reset_due(self.last_reset, now)
    }

    /// Restore the allowance if a reset is due. Returns true if it did.
    pub fn reset_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_reset_due(now) {
            return false;
        }
        self.remaining = self.monthly_allowance;
        self.last_reset = now;
        self.updated_at = now;
        true
    }

    /// Append an unread notification for an alert and return its ID
    pub fn push_notification(&mut self, alert: &Alert, now: DateTime<Utc>) -> NotificationId {
        let mut sequence = 0;
        let mut id = NotificationId::at(now, sequence);
        while self.notifications.iter().any(|n| n.id == id) {
            sequence += 1;
            id = NotificationId::at(now, sequence);
        }

        self.notifications
            .push(Notification::from_alert(id.clone(), alert, now));
        self.updated_at = now;
        id
    }

    /// Find a notification by ID
    pub fn notification(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    /// Mark a notification read
    ///
    /// Returns `None` if no such notification exists, otherwise whether the
    /// read flag changed.
    pub fn mark_notification_read(&mut self, id: &NotificationId) -> Option<bool> {
        let changed = self
            .notifications
            .iter_mut()
            .find(|n| &n.id == id)?
            .mark_read();
        Some(changed)
    }

    /// Mark every notification read, returning how many changed
    pub fn mark_all_read(&mut self) -> usize {
        self.notifications
            .iter_mut()
            .map(|n| n.mark_read())
            .filter(|changed| *changed)
            .count()
    }

    /// Number of unread notifications
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if !self.email.contains('@') {
            return Err(AccountValidationError::InvalidEmail(self.email.clone()));
        }

        if !self.monthly_allowance.is_valid_positive() {
            return Err(AccountValidationError::NonPositiveAllowance);
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {} left)",
            self.name, self.remaining, self.monthly_allowance
        )
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidEmail(String),
    NonPositiveAllowance,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
            Self::NonPositiveAllowance => write!(f, "Monthly allowance must be positive"),
        }
    }
}

impl std::error::Error for AccountValidationError {}
