//! Budget threshold evaluation
//!
//! [`classify`] is the pure policy. [`ThresholdEvaluator`] abstracts over
//! where it runs: in process ([`LocalThresholdEvaluator`]) or behind an HTTP
//! endpoint ([`HttpThresholdEvaluator`]). The engine always calls through a
//! [`BoundedEvaluator`], which adds a per-attempt timeout and bounded retries.

mod bounded;
mod http;

pub use bounded::BoundedEvaluator;
pub use http::HttpThresholdEvaluator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Alert, AlertKind, Money};

/// Figures the threshold policy is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdInput {
    /// Amount about to be deducted from the payer
    pub total_spend: Money,
    /// Payer's monthly allowance
    pub allowance: Money,
    /// Payer's remaining balance before the deduction
    pub remaining_before: Money,
}

impl ThresholdInput {
    pub fn new(total_spend: Money, allowance: Money, remaining_before: Money) -> Self {
        Self {
            total_spend,
            allowance,
            remaining_before,
        }
    }

    pub fn remaining_after(&self) -> Money {
        self.remaining_before - self.total_spend
    }
}

/// Classify the payer's post-deduction state
///
/// - `near_limit_percent <= spent% < 100` gives `NEAR_LIMIT`
/// - otherwise a remaining balance `<= 0` gives `OVER_LIMIT`
/// - otherwise no alert
///
/// # Errors
///
/// `InvalidBudget` if the allowance is not a positive finite amount, or if
/// the deduction or balance is not finite.
pub fn classify(input: &ThresholdInput, near_limit_percent: f64) -> LedgerResult<Option<Alert>> {
    if !input.allowance.is_valid_positive() {
        return Err(LedgerError::InvalidBudget(format!(
            "monthly allowance must be positive, got {}",
            input.allowance.value()
        )));
    }
    if !input.total_spend.is_finite() || input.total_spend.is_negative() {
        return Err(LedgerError::InvalidBudget(format!(
            "deduction must be a non-negative amount, got {}",
            input.total_spend.value()
        )));
    }
    if !input.remaining_before.is_finite() {
        return Err(LedgerError::InvalidBudget(
            "remaining balance is not a finite amount".into(),
        ));
    }

    let remaining_after = input.remaining_after();
    let percent_spent =
        (input.allowance - remaining_after).value() / input.allowance.value() * 100.0;

    if percent_spent >= near_limit_percent && percent_spent < 100.0 {
        Ok(Some(Alert::new(
            AlertKind::NearLimit,
            format!(
                "You have spent {}% or more of your monthly budget",
                near_limit_percent
            ),
        )))
    } else if remaining_after.value() <= 0.0 {
        Ok(Some(Alert::from(AlertKind::OverLimit)))
    } else {
        Ok(None)
    }
}

/// Something that can classify a spend against a budget
#[async_trait]
pub trait ThresholdEvaluator: Send + Sync {
    async fn evaluate(&self, input: ThresholdInput) -> LedgerResult<Option<Alert>>;
}

/// Runs [`classify`] in process
#[derive(Debug, Clone)]
pub struct LocalThresholdEvaluator {
    near_limit_percent: f64,
}

impl LocalThresholdEvaluator {
    pub fn new(near_limit_percent: f64) -> Self {
        Self { near_limit_percent }
    }
}

impl Default for LocalThresholdEvaluator {
    fn default() -> Self {
        Self::new(80.0)
    }
}

#[async_trait]
impl ThresholdEvaluator for LocalThresholdEvaluator {
    async fn evaluate(&self, input: ThresholdInput) -> LedgerResult<Option<Alert>> {
        classify(&input, self.near_limit_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(allowance: f64, remaining_before: f64, spend: f64) -> Option<AlertKind> {
        let input = ThresholdInput::new(
            Money::new(spend),
            Money::new(allowance),
            Money::new(remaining_before),
        );
        classify(&input, 80.0).unwrap().map(|a| a.kind)
    }

    #[test]
    fn test_near_limit_at_85_percent() {
        assert_eq!(kind(1000.0, 1000.0, 850.0), Some(AlertKind::NearLimit));
    }

    #[test]
    fn test_over_limit_when_negative() {
        assert_eq!(kind(500.0, 100.0, 150.0), Some(AlertKind::OverLimit));
    }

    #[test]
    fn test_exactly_80_percent_is_near_limit() {
        assert_eq!(kind(1000.0, 1000.0, 800.0), Some(AlertKind::NearLimit));
    }

    #[test]
    fn test_80_percent_boundary_divides_before_scaling() {
        // 18.40 of 23 is 79.99999999999999 if scaled before dividing
        assert_eq!(kind(23.0, 23.0, 18.4), Some(AlertKind::NearLimit));
    }

    #[test]
    fn test_exactly_100_percent_is_over_limit_not_near() {
        assert_eq!(kind(500.0, 500.0, 500.0), Some(AlertKind::OverLimit));
    }

    #[test]
    fn test_below_threshold_no_alert() {
        assert_eq!(kind(1000.0, 1000.0, 799.0), None);
        assert_eq!(kind(1000.0, 1000.0, 0.0), None);
    }

    #[test]
    fn test_already_over_stays_over() {
        assert_eq!(kind(1000.0, -20.0, 5.0), Some(AlertKind::OverLimit));
    }

    #[test]
    fn test_deterministic() {
        let first = kind(300.0, 120.0, 70.0);
        for _ in 0..10 {
            assert_eq!(kind(300.0, 120.0, 70.0), first);
        }
    }

    #[test]
    fn test_custom_percent_in_message() {
        let input = ThresholdInput::new(Money::new(90.0), Money::new(100.0), Money::new(100.0));
        let alert = classify(&input, 75.0).unwrap().unwrap();
        assert_eq!(alert.kind, AlertKind::NearLimit);
        assert!(alert.message.contains("75%"));
    }

    #[test]
    fn test_zero_allowance_is_invalid_budget() {
        let input = ThresholdInput::new(Money::new(10.0), Money::zero(), Money::zero());
        assert!(matches!(
            classify(&input, 80.0),
            Err(LedgerError::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_non_finite_spend_is_invalid_budget() {
        let input = ThresholdInput::new(Money::new(f64::NAN), Money::new(10.0), Money::new(10.0));
        assert!(matches!(
            classify(&input, 80.0),
            Err(LedgerError::InvalidBudget(_))
        ));
    }

    #[tokio::test]
    async fn test_local_evaluator_matches_classify() {
        let evaluator = LocalThresholdEvaluator::default();
        let input = ThresholdInput::new(Money::new(850.0), Money::new(1000.0), Money::new(1000.0));
        let alert = evaluator.evaluate(input).await.unwrap().unwrap();
        assert_eq!(alert.kind, AlertKind::NearLimit);
    }
}
