use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

#[async_trait]
pub trait CountFetcher {
    async fn fetch_count(&self) -> Result<VisitorCount, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("status code -> {status}, server error message -> {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response is not a visitor count: {0}")]
    NotNumeric(Value),
}

/// Non-negative number returned by the counting service, kept as received so
/// it renders verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitorCount(Number);

impl VisitorCount {
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        match value {
            Value::Number(n) if is_non_negative(&n) => Ok(VisitorCount(n)),
            other => Err(FetchError::NotNumeric(other)),
        }
    }
}

// -0.0 counts as negative
fn is_non_negative(n: &Number) -> bool {
    n.as_f64()
        .map_or(false, |v| v.is_finite() && !v.is_sign_negative())
}

impl From<u64> for VisitorCount {
    fn from(count: u64) -> Self {
        VisitorCount(Number::from(count))
    }
}

impl fmt::Display for VisitorCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for VisitorCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        VisitorCount::from_value(value).map_err(serde::de::Error::custom)
    }
}

pub struct HttpCountFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCountFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        // the count changes on every visit
        let mut headers = HeaderMap::new();
        headers.insert(
            "Cache-Control",
            HeaderValue::from_static("max-age=0, no-cache, no-store, must-revalidate"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(Duration::from_secs(120))
            .timeout(timeout)
            .build()?;

        Ok(HttpCountFetcher {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn handle_error_response(&self, response: reqwest::Response) -> FetchError {
        let status = response.status();
        let message = response.text().await.unwrap_or_else(|_| "none".to_string());
        FetchError::Status { status, message }
    }
}

#[async_trait]
impl CountFetcher for HttpCountFetcher {
    async fn fetch_count(&self) -> Result<VisitorCount, FetchError> {
        tracing::info!("fetching visitor count from {}", self.endpoint);
        let response = self.client.get(self.endpoint.as_str()).send().await?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body).map_err(FetchError::Decode)?;
        let count = VisitorCount::from_value(value)?;

        tracing::debug!("received visitor count: {}", count);
        Ok(count)
    }
}
