//! FlightPulse - Airline Booking Market Dashboard Core
//!
//! Fetches or synthesizes flight booking records, derives route popularity,
//! price trends and summary metrics, and attaches narrative market insights.
//! Every external source is optional: a missing credential or a failed call
//! substitutes generated data, so a refresh always produces a full dashboard.
//!
//! ## Quick Start
//!
//! ```ignore
//! use flightpulse::{ConfigLoader, Dashboard};
//!
//! let config = ConfigLoader::load()?;
//! let dashboard = Dashboard::from_config(&config)?;
//! dashboard.refresh(false).await;
//! let snapshot = dashboard.snapshot().await;
//! ```
//!
//! ## Modules
//!
//! - [`market`]: source services, fallback policy and aggregation
//! - [`provider`]: HTTP adapters behind the three capability traits
//! - [`dashboard`]: refresh orchestration and displayed state
//! - [`config`]: layered configuration

pub mod cli;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod market;
pub mod provider;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, TrendSource};

// Error Types
pub use types::error::{FailureKind, PulseError, Result, SourceError, SourceResult};

// Dashboard
pub use dashboard::{ApiStatus, Dashboard, DashboardSnapshot, Indicator, RefreshOutcome};

// =============================================================================
// Market Re-exports
// =============================================================================

pub use market::{
    DataOrigin, FlightDataService, InsightResolver, MarketTrendService, Resolution,
    compute_popular_routes, compute_price_trends,
};
pub use types::{FlightRecord, MarketInsight, MarketSummary, PriceTrend, RoutePopularity};

// =============================================================================
// Provider Re-exports
// =============================================================================

pub use provider::{FlightDataSource, InsightTextSource, MarketIndexSource, ProviderSet};
