//! Analytics backend client.
//!
//! The backend answers `GET {base_url}/analytics?timeRange=<range>` with an
//! envelope `{ success, data?, message? }`. Anything other than
//! `success: true` is an error carrying the backend's message.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::normalize::normalize;
use super::types::{AnalyticsData, TimeRange};
use crate::config::AnalyticsConfig;

const DEFAULT_FAILURE_MESSAGE: &str = "Failed to fetch analytics data";

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid analytics base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("analytics request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analytics backend returned HTTP {0}")]
    Status(u16),

    #[error("malformed analytics response: {0}")]
    Decode(#[from] serde_json::Error),

    /// `success: false`; displayed verbatim
    #[error("{0}")]
    Rejected(String),
}

/// Response envelope used by the backend
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode an envelope body into normalized analytics
pub fn parse_envelope(body: &str) -> Result<AnalyticsData, AnalyticsError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;
    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        return Err(AnalyticsError::Rejected(message));
    }
    Ok(normalize(envelope.data.as_ref().unwrap_or(&Value::Null)))
}

/// Anything that can produce analytics for a time range
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn fetch(&self, range: TimeRange) -> Result<AnalyticsData, AnalyticsError>;
}

/// HTTP implementation against the Aegis backend
pub struct HttpAnalyticsSource {
    client: Client,
    endpoint: Url,
}

impl HttpAnalyticsSource {
    pub fn new(config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let endpoint = analytics_endpoint(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `{base_url}/analytics`, tolerating a trailing slash on the base
pub fn analytics_endpoint(base_url: &str) -> Result<Url, AnalyticsError> {
    let joined = format!("{}/analytics", base_url.trim_end_matches('/'));
    Url::parse(&joined).map_err(|source| AnalyticsError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })
}

#[async_trait]
impl AnalyticsSource for HttpAnalyticsSource {
    async fn fetch(&self, range: TimeRange) -> Result<AnalyticsData, AnalyticsError> {
        debug!("GET {} timeRange={}", self.endpoint, range);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("timeRange", range.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match parse_envelope(&body) {
            Ok(data) => Ok(data),
            // Backends often send an envelope with the error message alongside a 4xx/5xx
            Err(AnalyticsError::Decode(_)) if !status.is_success() => {
                Err(AnalyticsError::Status(status.as_u16()))
            }
            Err(e) => Err(e),
        }
    }
}
