//! Calendar-month budget periods
//!
//! Allowances renew at 00:00 UTC on the first day of every month. All
//! comparisons take explicit instants so that callers (and tests) control
//! the clock.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month (e.g., "2024-06")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BudgetMonth {
    pub year: i32,
    pub month: u32,
}

impl BudgetMonth {
    /// The month containing the given instant
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    /// First instant of this month, 00:00 UTC
    pub fn start(&self) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN);
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// First instant of the month containing `now`
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    BudgetMonth::containing(now).start()
}

/// Whether an account last reset at `last_reset` needs a reset at `now`
///
/// This is the single comparison rule shared by the scheduled sweep and the
/// lazy per-request check.
pub fn is_reset_due(last_reset: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_reset < month_start(now)
}
