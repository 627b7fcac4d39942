/// AirSight API Client
///
/// Retrieves the city snapshot, current insights and short-term forecast
/// from the AirSight REST API.
///
/// Endpoints (all under `/api/v1`):
///   GET /search?city={name}
///   GET /insights/current?city={name}
///   GET /insights/forecast?city={name}&horizon={hours}
///
/// Every request sends `accept: application/json` and is bounded by the
/// client-wide timeout. A timed-out request is reported as
/// `DashboardError::Timeout` and otherwise handled like any network failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::ingest::AirQualityApi;
use crate::model::{DashboardError, ForecastResult, InsightResult, Snapshot};

const API_PREFIX: &str = "/api/v1";

// ============================================================================
// URL construction
// ============================================================================

fn endpoint(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, DashboardError> {
    let raw = format!("{}{}{}", base_url.trim_end_matches('/'), API_PREFIX, path);
    Url::parse_with_params(&raw, params)
        .map_err(|e| DashboardError::Network(format!("invalid request URL {}: {}", raw, e)))
}

/// `{base}/api/v1/search?city={city}`, with `city` percent-encoded.
pub fn build_search_url(base_url: &str, city: &str) -> Result<Url, DashboardError> {
    endpoint(base_url, "/search", &[("city", city)])
}

pub fn build_insights_url(base_url: &str, city: &str) -> Result<Url, DashboardError> {
    endpoint(base_url, "/insights/current", &[("city", city)])
}

pub fn build_forecast_url(base_url: &str, city: &str, horizon: u32) -> Result<Url, DashboardError> {
    let horizon = horizon.to_string();
    endpoint(
        base_url,
        "/insights/forecast",
        &[("city", city), ("horizon", horizon.as_str())],
    )
}

// ============================================================================
// Error bodies
// ============================================================================

/// Text to surface for a non-2xx response.
///
/// The API reports errors as `{"detail": "..."}`; that string is used when
/// present. Otherwise the trimmed body is used as-is, and an empty body
/// falls back to the status code.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = obj.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        // Fail early on an unusable base URL rather than on the first search.
        build_search_url(base_url, "")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, url: &Url, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            DashboardError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            DashboardError::Network(err.to_string())
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DashboardError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        if !status.is_success() {
            return Err(DashboardError::Http {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| DashboardError::Parse(format!("{}: {}", url.path(), e)))
    }
}

#[async_trait]
impl AirQualityApi for HttpApiClient {
    async fn snapshot(&self, city: &str) -> Result<Snapshot, DashboardError> {
        self.fetch_json(build_search_url(&self.base_url, city)?).await
    }

    async fn current_insights(&self, city: &str) -> Result<InsightResult, DashboardError> {
        self.fetch_json(build_insights_url(&self.base_url, city)?).await
    }

    async fn forecast(&self, city: &str, horizon: u32) -> Result<ForecastResult, DashboardError> {
        self.fetch_json(build_forecast_url(&self.base_url, city, horizon)?).await
    }
}

// ============================================================================
// Tests
// ============================================================================
