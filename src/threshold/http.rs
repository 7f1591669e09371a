//! Threshold evaluation over HTTP
//!
//! Request body: `{"total_spend": .., "allowance": .., "remaining_before": ..}`.
//! Response body: `{"alert_kind": "NEAR_LIMIT" | "OVER_LIMIT" | null, "message": ..}`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Alert, AlertKind};

use super::{ThresholdEvaluator, ThresholdInput};

#[derive(Debug, Deserialize)]
struct ThresholdResponse {
    #[serde(default)]
    alert_kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ThresholdResponse {
    fn into_alert(self) -> LedgerResult<Option<Alert>> {
        let Some(raw_kind) = self.alert_kind else {
            return Ok(None);
        };

        let kind = AlertKind::parse(&raw_kind).ok_or_else(|| {
            LedgerError::ThresholdServiceUnavailable(format!(
                "unknown alert kind in response: {}",
                raw_kind
            ))
        })?;

        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| kind.default_message().to_string());

        Ok(Some(Alert::new(kind, message)))
    }
}

/// Calls a remote threshold service
pub struct HttpThresholdEvaluator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpThresholdEvaluator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ThresholdEvaluator for HttpThresholdEvaluator {
    async fn evaluate(&self, input: ThresholdInput) -> LedgerResult<Option<Alert>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&input)
            .send()
            .await
            .map_err(|e| LedgerError::ThresholdServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::InvalidBudget(body));
        }
        if !status.is_success() {
            return Err(LedgerError::ThresholdServiceUnavailable(format!(
                "threshold service returned {}",
                status
            )));
        }

        let body: ThresholdResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::ThresholdServiceUnavailable(e.to_string()))?;

        body.into_alert()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LedgerResult<Option<Alert>> {
        serde_json::from_str::<ThresholdResponse>(json)
            .unwrap()
            .into_alert()
    }

    #[test]
    fn test_no_alert() {
        assert_eq!(parse(r#"{"alert_kind": null}"#).unwrap(), None);
        assert_eq!(parse("{}").unwrap(), None);
    }

    #[test]
    fn test_alert_with_message() {
        let alert = parse(r#"{"alert_kind": "OVER_LIMIT", "message": "Stop spending"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(alert.kind, AlertKind::OverLimit);
        assert_eq!(alert.message, "Stop spending");
    }

    #[test]
    fn test_missing_message_uses_default() {
        let alert = parse(r#"{"alert_kind": "NEAR_LIMIT"}"#).unwrap().unwrap();
        assert_eq!(alert.message, AlertKind::NearLimit.default_message());
    }

    #[test]
    fn test_unknown_kind_is_unavailable() {
        assert!(matches!(
            parse(r#"{"alert_kind": "PANIC"}"#),
            Err(LedgerError::ThresholdServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let evaluator = HttpThresholdEvaluator::new("http://127.0.0.1:9/threshold");
        let input = ThresholdInput::new(
            crate::models::Money::new(1.0),
            crate::models::Money::new(10.0),
            crate::models::Money::new(10.0),
        );
        assert!(matches!(
            evaluator.evaluate(input).await,
            Err(LedgerError::ThresholdServiceUnavailable(_))
        ));
    }
}
