//! Alpha Vantage Provider
//!
//! Market index source backed by the `TIME_SERIES_DAILY` function.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{DailySeries, MarketIndexSource, build_client, send_json};
use crate::types::{Result, SourceError, SourceResult};

const SOURCE: &str = "alphavantage";

pub struct AlphaVantageProvider {
    api_key: SecretString,
    endpoint: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AlphaVantageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaVantageProvider")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AlphaVantageProvider {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            endpoint: endpoint.to_string(),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl MarketIndexSource for AlphaVantageProvider {
    async fn daily_series(&self, symbol: &str) -> SourceResult<DailySeries> {
        debug!(symbol, "Requesting daily series from Alpha Vantage");

        let request = self.client.get(&self.endpoint).query(&[
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("apikey", self.api_key.expose_secret()),
        ]);

        let body: DailyResponse = send_json(SOURCE, request).await?;
        body.into_series()
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

/// Alpha Vantage answers quota and symbol errors with HTTP 200 and a note
/// instead of the series.
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<DailySeries>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

impl DailyResponse {
    fn into_series(self) -> SourceResult<DailySeries> {
        if let Some(series) = self.series {
            return Ok(series);
        }

        let reason = self
            .error_message
            .or(self.note)
            .or(self.information)
            .unwrap_or_else(|| "response has no daily time series".to_string());
        Err(SourceError::malformed(SOURCE, reason))
    }
}
