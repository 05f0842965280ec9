//! Demand forecast client
//!
//! Read-only HTTP client for the external forecasting service. The
//! service is optional: any transport error, non-success status, or
//! malformed body degrades to "no forecast" and the caller's request
//! still succeeds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One projected day of demand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub predicted_demand: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub lower: f64,
    pub upper: f64,
}

/// Wire envelope of the forecasting service
#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    data: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the demand forecasting service
#[derive(Debug, Clone)]
pub struct ForecastClient {
    base_url: String,
    http: reqwest::Client,
}

impl ForecastClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Whether the service reports itself healthy
    pub async fn health(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        match response {
            Ok(resp) => match resp.json::<HealthResponse>().await {
                Ok(health) => health.status == "healthy",
                Err(_) => false,
            },
            Err(err) => {
                tracing::debug!(error = %err, "Forecast health check failed");
                false
            }
        }
    }

    /// Daily demand projection for the next `days` days
    ///
    /// Returns `None` on any failure; never propagates an error into
    /// the analytics path.
    pub async fn daily(&self, days: u32) -> Option<Vec<DailyForecast>> {
        let url = format!("{}/api/forecast/daily", self.base_url);
        let result = self
            .http
            .get(&url)
            .query(&[("days", days)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(error = %err, "Forecast service unavailable, omitting forecast");
                return None;
            }
        };
        match response.json::<ForecastEnvelope>().await {
            Ok(envelope) => Some(envelope.data),
            Err(err) => {
                tracing::warn!(error = %err, "Malformed forecast response, omitting forecast");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ForecastClient::new("http://forecast:5001/");
        assert_eq!(client.base_url, "http://forecast:5001");
    }

    #[test]
    fn test_envelope_deserialization() {
        let body = r#"{
            "forecast_type": "daily",
            "model_used": "prophet",
            "generated_at": "2026-08-27T10:00:00Z",
            "forecast_horizon": 7,
            "data": [
                {"date": "2026-08-28", "predicted_demand": 182.4,
                 "confidence": {"lower": 150.0, "upper": 210.0}},
                {"date": "2026-08-29", "predicted_demand": 120.0}
            ]
        }"#;
        let envelope: ForecastEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].date, "2026-08-28");
        assert!(envelope.data[0].confidence.is_some());
        assert!(envelope.data[1].confidence.is_none());
    }
}
