//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/flightpulse/) and project (.flightpulse/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{generator, network};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// API credentials for the external sources
    pub credentials: Credentials,

    /// Base URLs of the external sources
    pub endpoints: EndpointConfig,

    /// Text generation settings for market insights
    pub insights: InsightConfig,

    /// Synthetic record generation settings
    pub generator: GeneratorConfig,

    /// HTTP client settings
    pub network: NetworkConfig,

    /// Dashboard composition settings
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            credentials: Credentials::default(),
            endpoints: EndpointConfig::default(),
            insights: InsightConfig::default(),
            generator: GeneratorConfig::default(),
            network: NetworkConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PulseError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=2.0).contains(&self.insights.temperature) {
            return Err(crate::types::PulseError::Config(format!(
                "Insight temperature must be between 0.0 and 2.0, got {}",
                self.insights.temperature
            )));
        }

        if self.insights.max_tokens == 0 {
            return Err(crate::types::PulseError::Config(
                "Insight max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.network.timeout_secs == 0 {
            return Err(crate::types::PulseError::Config(
                "Network timeout_secs must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("text_gen", &self.endpoints.text_gen),
            ("flight_data", &self.endpoints.flight_data),
            ("market_index", &self.endpoints.market_index),
        ] {
            url::Url::parse(url).map_err(|e| {
                crate::types::PulseError::Config(format!(
                    "Invalid endpoint for {}: {} ({})",
                    name, url, e
                ))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Presence of a credential is the only switch between live and mock data.
///
/// Credentials are never serialized to output and are redacted in debug output.
/// Each source converts its key to `SecretString` internally.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Text generation (OpenAI-compatible) API key
    #[serde(skip_serializing)]
    pub text_gen: Option<String>,

    /// Flight schedule (Aviationstack) access key
    #[serde(skip_serializing)]
    pub flight_data: Option<String>,

    /// Market index (Alpha Vantage) API key
    #[serde(skip_serializing)]
    pub market_index: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("text_gen", &redact(&self.text_gen))
            .field("flight_data", &redact(&self.flight_data))
            .field("market_index", &redact(&self.market_index))
            .finish()
    }
}

impl Credentials {
    /// Treat blank strings as absent
    fn present(key: &Option<String>) -> Option<&str> {
        key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn text_gen(&self) -> Option<&str> {
        Self::present(&self.text_gen)
    }

    pub fn flight_data(&self) -> Option<&str> {
        Self::present(&self.flight_data)
    }

    pub fn market_index(&self) -> Option<&str> {
        Self::present(&self.market_index)
    }
}

// =============================================================================
// Endpoints
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// OpenAI-compatible API base (chat completions live under it)
    pub text_gen: String,

    /// Aviationstack API base
    pub flight_data: String,

    /// Alpha Vantage query endpoint
    pub market_index: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            text_gen: network::OPENAI_API_BASE.to_string(),
            flight_data: network::AVIATIONSTACK_API_BASE.to_string(),
            market_index: network::ALPHAVANTAGE_API_BASE.to_string(),
        }
    }
}

// =============================================================================
// Insight Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Model name
    pub model: String,

    /// Temperature for generation
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 800,
        }
    }
}

// =============================================================================
// Generator Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Records per synthetic batch
    pub record_count: usize,

    /// Fixed RNG seed; random per session when unset
    pub seed: Option<u64>,

    /// Artificial delay before synthetic data is returned (milliseconds)
    pub simulated_latency_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            record_count: generator::DEFAULT_RECORD_COUNT,
            seed: None,
            simulated_latency_ms: 0,
        }
    }
}

// =============================================================================
// Network Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Dashboard Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where the price trend chart gets its points
    pub trend_source: TrendSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendSource {
    /// Market index series (live or synthesized)
    #[default]
    Market,
    /// First records of the current flight batch
    Records,
}

impl std::fmt::Display for TrendSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendSource::Market => write!(f, "market"),
            TrendSource::Records => write!(f, "records"),
        }
    }
}

impl std::str::FromStr for TrendSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "market" => Ok(TrendSource::Market),
            "records" => Ok(TrendSource::Records),
            _ => Err(format!(
                "Unknown trend source: {}. Valid values: market, records",
                s
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
