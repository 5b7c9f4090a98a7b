use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt::{self, Debug};
use tracing::{debug, warn};

/// What came back from the weather endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// HTTP 200 with its parsed body.
    Weather(Value),
    /// HTTP 401.
    BadApiKey,
    /// HTTP 404.
    LocationUnknown,
    /// Any other status, passed through untouched.
    Unclassified(u16),
}

impl FetchOutcome {
    /// Short label used for the two recognised failures.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            FetchOutcome::BadApiKey => Some("BAD_API"),
            FetchOutcome::LocationUnknown => Some("LOCATION_UNKNOWN"),
            _ => None,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Weather(_) => f.write_str("OK"),
            FetchOutcome::Unclassified(status) => write!(f, "{status}"),
            other => f.write_str(other.label().unwrap_or_default()),
        }
    }
}

/// Map a status code and body to an outcome. Only 200 bodies are parsed.
pub fn classify_status(status: u16, body: &str) -> Result<FetchOutcome> {
    let outcome = match status {
        200 => FetchOutcome::Weather(
            serde_json::from_str(body).context("Failed to parse OpenWeather JSON response")?,
        ),
        401 => FetchOutcome::BadApiKey,
        404 => FetchOutcome::LocationUnknown,
        other => {
            warn!(status = other, body = %truncate_body(body), "unexpected OpenWeather status");
            FetchOutcome::Unclassified(other)
        }
    };

    Ok(outcome)
}

#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome>;
}

/// Plain reqwest-backed fetcher: one GET, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

#[async_trait]
impl WeatherFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to OpenWeather")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather response body")?;

        debug!(%status, "OpenWeather responded");
        classify_status(status.as_u16(), &body)
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
