//! Market Data Provider Abstraction
//!
//! Three narrow capabilities stand between the dashboard core and the outside
//! world. Each one is optional: a provider is only constructed when its
//! credential is configured, and an absent provider is what switches the
//! corresponding service to mock data.
//!
//! ## Capabilities
//!
//! - [`FlightDataSource`]: scheduled flights for one route pair
//! - [`InsightTextSource`]: free text completion for a prompt
//! - [`MarketIndexSource`]: daily closing prices for a ticker

mod alphavantage;
mod aviationstack;
mod openai;

pub use alphavantage::AlphaVantageProvider;
pub use aviationstack::AviationstackProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::types::{PulseError, Result, SourceError, SourceResult};

// =============================================================================
// Wire Shapes
// =============================================================================

/// Directed airport pair queried from the flight source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePair {
    pub departure: &'static str,
    pub arrival: &'static str,
}

impl std::fmt::Display for RoutePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}→{}", self.departure, self.arrival)
    }
}

/// Flight as reported by the external schedule source
///
/// Only the fields the dashboard maps are kept; everything is optional since
/// the upstream payload omits fields freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExternalFlight {
    #[serde(default)]
    pub flight_date: Option<String>,
    #[serde(default)]
    pub departure: Option<AirportRef>,
    #[serde(default)]
    pub arrival: Option<AirportRef>,
    #[serde(default)]
    pub airline: Option<AirlineRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AirportRef {
    #[serde(default)]
    pub iata: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AirlineRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// One trading day of the market index
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DailyQuote {
    #[serde(rename = "4. close")]
    pub close: String,
}

/// Daily quotes keyed by `YYYY-MM-DD`
pub type DailySeries = BTreeMap<String, DailyQuote>;

// =============================================================================
// Capability Traits
// =============================================================================

/// Source of scheduled flights
#[async_trait]
pub trait FlightDataSource: Send + Sync {
    /// Fetch flights for one route pair
    async fn fetch_route(&self, route: RoutePair) -> SourceResult<Vec<ExternalFlight>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Source of generated insight text
#[async_trait]
pub trait InsightTextSource: Send + Sync {
    /// Complete a prompt; the reply is expected to be a JSON array of insights
    async fn complete(&self, prompt: &str) -> SourceResult<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Source of daily market index closes
#[async_trait]
pub trait MarketIndexSource: Send + Sync {
    /// Daily series for a ticker symbol
    async fn daily_series(&self, symbol: &str) -> SourceResult<DailySeries>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

pub type SharedFlightSource = Arc<dyn FlightDataSource>;
pub type SharedInsightSource = Arc<dyn InsightTextSource>;
pub type SharedMarketSource = Arc<dyn MarketIndexSource>;

// =============================================================================
// Provider Set
// =============================================================================

/// The providers available for this session, one slot per capability
#[derive(Clone, Default)]
pub struct ProviderSet {
    pub flights: Option<SharedFlightSource>,
    pub insights: Option<SharedInsightSource>,
    pub market: Option<SharedMarketSource>,
}

impl ProviderSet {
    /// Construct providers for every configured credential
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.network.timeout_secs);

        let flights = match config.credentials.flight_data() {
            Some(key) => Some(Arc::new(AviationstackProvider::new(
                key,
                &config.endpoints.flight_data,
                timeout,
            )?) as SharedFlightSource),
            None => None,
        };

        let insights = match config.credentials.text_gen() {
            Some(key) => Some(Arc::new(OpenAiProvider::new(
                key,
                &config.endpoints.text_gen,
                &config.insights,
                timeout,
            )?) as SharedInsightSource),
            None => None,
        };

        let market = match config.credentials.market_index() {
            Some(key) => Some(Arc::new(AlphaVantageProvider::new(
                key,
                &config.endpoints.market_index,
                timeout,
            )?) as SharedMarketSource),
            None => None,
        };

        Ok(Self {
            flights,
            insights,
            market,
        })
    }
}

/// Shared HTTP client construction
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PulseError::Client(format!("Failed to create HTTP client: {}", e)))
}

/// Send a request and decode a JSON body, classifying every failure
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    source: &'static str,
    request: reqwest::RequestBuilder,
) -> SourceResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::from_reqwest(source, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::from_status(source, status.as_u16(), &body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SourceError::from_reqwest(source, &e))?;

    serde_json::from_str(&body).map_err(|e| SourceError::malformed(source, e.to_string()))
}
