//! Timeout and retry policy around a threshold evaluator

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};

use crate::config::ThresholdSettings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Alert;

use super::{ThresholdEvaluator, ThresholdInput};

/// Wraps an evaluator with a per-attempt timeout and exponential backoff
///
/// `InvalidBudget` is a caller error and is returned immediately. Any other
/// failure, or a timeout, is retried up to `max_attempts`; after that the
/// call fails with `ThresholdServiceUnavailable`.
pub struct BoundedEvaluator {
    inner: Arc<dyn ThresholdEvaluator>,
    settings: ThresholdSettings,
}

impl BoundedEvaluator {
    pub fn new(inner: Arc<dyn ThresholdEvaluator>, settings: ThresholdSettings) -> Self {
        Self { inner, settings }
    }
}

#[async_trait]
impl ThresholdEvaluator for BoundedEvaluator {
    async fn evaluate(&self, input: ThresholdInput) -> LedgerResult<Option<Alert>> {
        let attempts = self.settings.max_attempts.max(1);
        let mut backoff = self.settings.backoff();
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            match timeout(self.settings.timeout(), self.inner.evaluate(input)).await {
                Ok(Ok(alert)) => return Ok(alert),
                Ok(Err(err @ LedgerError::InvalidBudget(_))) => return Err(err),
                Ok(Err(err)) => last_failure = err.to_string(),
                Err(_) => {
                    last_failure = format!("timed out after {}ms", self.settings.timeout_ms)
                }
            }

            tracing::warn!(
                attempt,
                attempts,
                error = %last_failure,
                "Threshold evaluation failed"
            );

            if attempt < attempts {
                sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(LedgerError::ThresholdServiceUnavailable(format!(
            "{} attempt(s) failed, last error: {}",
            attempts, last_failure
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, Money};
    use crate::threshold::LocalThresholdEvaluator;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct Flaky {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ThresholdEvaluator for Flaky {
        async fn evaluate(&self, input: ThresholdInput) -> LedgerResult<Option<Alert>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(LedgerError::Storage("connection reset".into()));
            }
            LocalThresholdEvaluator::default().evaluate(input).await
        }
    }

    struct Hangs;

    #[async_trait]
    impl ThresholdEvaluator for Hangs {
        async fn evaluate(&self, _input: ThresholdInput) -> LedgerResult<Option<Alert>> {
            sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    fn settings(max_attempts: u32) -> ThresholdSettings {
        ThresholdSettings {
            endpoint: None,
            timeout_ms: 20,
            max_attempts,
            backoff_ms: 1,
        }
    }

    fn input() -> ThresholdInput {
        ThresholdInput::new(Money::new(850.0), Money::new(1000.0), Money::new(1000.0))
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let flaky = Arc::new(Flaky {
            failures_left: AtomicU32::new(2),
            calls: AtomicU32::new(0),
        });
        let bounded = BoundedEvaluator::new(flaky.clone(), settings(3));

        let alert = bounded.evaluate(input()).await.unwrap().unwrap();
        assert_eq!(alert.kind, AlertKind::NearLimit);
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_are_unavailable() {
        let flaky = Arc::new(Flaky {
            failures_left: AtomicU32::new(5),
            calls: AtomicU32::new(0),
        });
        let bounded = BoundedEvaluator::new(flaky.clone(), settings(2));

        let err = bounded.evaluate(input()).await.unwrap_err();
        assert!(matches!(err, LedgerError::ThresholdServiceUnavailable(_)));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let bounded = BoundedEvaluator::new(Arc::new(Hangs), settings(2));

        let err = bounded.evaluate(input()).await.unwrap_err();
        assert!(matches!(err, LedgerError::ThresholdServiceUnavailable(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_invalid_budget_is_not_retried() {
        let bounded = BoundedEvaluator::new(Arc::new(LocalThresholdEvaluator::default()), settings(3));
        let bad = ThresholdInput::new(Money::new(10.0), Money::zero(), Money::zero());

        let err = bounded.evaluate(bad).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidBudget(_)));
    }
}
