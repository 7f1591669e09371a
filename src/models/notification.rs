//! Budget alerts and the notifications they leave on an account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::NotificationId;

/// Classification of a budget-threshold breach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    /// At least the near-limit percentage of the allowance is spent
    NearLimit,
    /// Remaining balance is zero or negative
    OverLimit,
}

impl AlertKind {
    /// Default user-facing message for this kind
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NearLimit => "You have spent 80% or more of your monthly budget",
            Self::OverLimit => "You have exceeded your monthly budget",
        }
    }

    /// Parse the wire representation ("NEAR_LIMIT", "OVER_LIMIT")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NEAR_LIMIT" => Some(Self::NearLimit),
            "OVER_LIMIT" => Some(Self::OverLimit),
            _ => None,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearLimit => write!(f, "NEAR_LIMIT"),
            Self::OverLimit => write!(f, "OVER_LIMIT"),
        }
    }
}

/// An evaluated alert, before it is attached to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<AlertKind> for Alert {
    fn from(kind: AlertKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

/// A notification stored on an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Create an unread notification from an alert
    pub fn from_alert(id: NotificationId, alert: &Alert, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: alert.kind,
            message: alert.message.clone(),
            created_at,
            read: false,
        }
    }

    /// Flip to read. Returns true if the flag changed.
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.read;
        self.read = true;
        changed
    }
}
