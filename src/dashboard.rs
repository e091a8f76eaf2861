//! Dashboard
//!
//! Owns the displayed state and runs refreshes. A refresh fetches records and
//! market trends concurrently, then insights, then derives the aggregate
//! views. Overlapping refreshes are tagged with a sequence number; only the
//! result of the most recently started refresh is applied.
//!
//! The pipeline runs in its own task so a panic inside it surfaces as a
//! `JoinError` instead of tearing down the caller. The previously displayed
//! state is kept in that case.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::config::{Config, TrendSource};
use crate::market::{
    DataOrigin, FlightDataService, InsightResolver, MarketTrendService, compute_popular_routes,
    compute_price_trends,
};
use crate::provider::ProviderSet;
use crate::types::{
    FlightRecord, MarketInsight, MarketSummary, PriceTrend, Result, RoutePopularity,
};

// =============================================================================
// State
// =============================================================================

/// Busy indicator shown by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    #[default]
    Idle,
    /// First load, nothing displayed yet
    Loading,
    /// User-requested refresh over existing data
    Refreshing,
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Indicator::Idle => write!(f, "idle"),
            Indicator::Loading => write!(f, "loading"),
            Indicator::Refreshing => write!(f, "refreshing"),
        }
    }
}

/// Where each displayed collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Origins {
    pub flights: DataOrigin,
    pub insights: DataOrigin,
    pub trends: DataOrigin,
}

/// Everything the presentation layer displays
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub records: Vec<FlightRecord>,
    pub insights: Vec<MarketInsight>,
    pub popular_routes: Vec<RoutePopularity>,
    pub price_trends: Vec<PriceTrend>,
    pub summary: MarketSummary,
    pub origins: Origins,
    /// Sequence of the refresh currently displayed (0 before the first)
    pub applied_sequence: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub indicator: Indicator,
}

/// Result of one `refresh` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The refresh result is now displayed
    Applied { sequence: u64 },
    /// A later refresh started before this one finished; result discarded
    Superseded { sequence: u64, latest: u64 },
    /// The pipeline failed unexpectedly; previous state kept
    Failed { sequence: u64 },
}

impl RefreshOutcome {
    pub fn sequence(&self) -> u64 {
        match self {
            RefreshOutcome::Applied { sequence }
            | RefreshOutcome::Superseded { sequence, .. }
            | RefreshOutcome::Failed { sequence } => *sequence,
        }
    }
}

// =============================================================================
// API Status
// =============================================================================

/// Whether a service will attempt live calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    Live,
    Mock,
}

impl ServiceMode {
    fn from_configured(configured: bool) -> Self {
        if configured {
            ServiceMode::Live
        } else {
            ServiceMode::Mock
        }
    }
}

impl std::fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceMode::Live => write!(f, "live"),
            ServiceMode::Mock => write!(f, "mock"),
        }
    }
}

/// Credential-based status of each external service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub insights: ServiceMode,
    pub flights: ServiceMode,
    pub market: ServiceMode,
    /// No service is live
    pub demo_mode: bool,
}

impl ApiStatus {
    pub fn from_providers(providers: &ProviderSet) -> Self {
        let insights = ServiceMode::from_configured(providers.insights.is_some());
        let flights = ServiceMode::from_configured(providers.flights.is_some());
        let market = ServiceMode::from_configured(providers.market.is_some());

        Self {
            insights,
            flights,
            market,
            demo_mode: [insights, flights, market]
                .iter()
                .all(|mode| *mode == ServiceMode::Mock),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

struct Pipeline {
    flights: FlightDataService,
    trends: MarketTrendService,
    insights: InsightResolver,
    trend_source: TrendSource,
}

/// Output of one pipeline run, not yet applied
struct Frame {
    records: Vec<FlightRecord>,
    insights: Vec<MarketInsight>,
    popular_routes: Vec<RoutePopularity>,
    price_trends: Vec<PriceTrend>,
    summary: MarketSummary,
    origins: Origins,
}

impl Pipeline {
    async fn run(&self) -> Frame {
        let market_trends = async {
            match self.trend_source {
                TrendSource::Market => Some(self.trends.fetch().await),
                TrendSource::Records => None,
            }
        };
        let (records, market_trends) = tokio::join!(self.flights.fetch(), market_trends);

        let (records, flights_origin) = records.into_parts();
        let (insights, insights_origin) = self.insights.resolve(&records).await.into_parts();

        let (price_trends, trends_origin) = match market_trends {
            Some(resolution) => resolution.into_parts(),
            None => (compute_price_trends(&records), flights_origin),
        };

        Frame {
            popular_routes: compute_popular_routes(&records),
            summary: MarketSummary::from_records(&records),
            records,
            insights,
            price_trends,
            origins: Origins {
                flights: flights_origin,
                insights: insights_origin,
                trends: trends_origin,
            },
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

pub struct Dashboard {
    pipeline: Arc<Pipeline>,
    api_status: ApiStatus,
    state: RwLock<DashboardSnapshot>,
    next_sequence: AtomicU64,
}

impl Dashboard {
    /// Build providers for the configured credentials and wire the services
    pub fn from_config(config: &Config) -> Result<Self> {
        let providers = ProviderSet::from_config(config)?;
        Ok(Self::new(providers, config))
    }

    pub fn new(providers: ProviderSet, config: &Config) -> Self {
        let api_status = ApiStatus::from_providers(&providers);
        let ProviderSet {
            flights,
            insights,
            market,
        } = providers;

        let pipeline = Pipeline {
            flights: FlightDataService::new(flights, &config.generator),
            trends: MarketTrendService::new(market, config.generator.seed),
            insights: InsightResolver::new(insights),
            trend_source: config.dashboard.trend_source,
        };

        Self {
            pipeline: Arc::new(pipeline),
            api_status,
            state: RwLock::new(DashboardSnapshot::default()),
            next_sequence: AtomicU64::new(0),
        }
    }

    pub fn api_status(&self) -> ApiStatus {
        self.api_status
    }

    /// Copy of the currently displayed state
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().await.clone()
    }

    /// Run one refresh.
    ///
    /// `force_visible_spinner` selects the `Refreshing` indicator over
    /// `Loading`. The lock is never held while external calls are in flight.
    pub async fn refresh(&self, force_visible_spinner: bool) -> RefreshOutcome {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.write().await.indicator = if force_visible_spinner {
            Indicator::Refreshing
        } else {
            Indicator::Loading
        };
        debug!(sequence, "Refresh started");

        let pipeline = Arc::clone(&self.pipeline);
        let joined = tokio::spawn(async move { pipeline.run().await }).await;

        let mut state = self.state.write().await;
        let latest = self.next_sequence.load(Ordering::SeqCst);
        if sequence == latest {
            state.indicator = Indicator::Idle;
        }

        let frame = match joined {
            Ok(frame) => frame,
            Err(e) => {
                error!(sequence, "Refresh failed, keeping previous data: {}", e);
                return RefreshOutcome::Failed { sequence };
            }
        };

        if sequence != latest {
            debug!(sequence, latest, "Discarding superseded refresh");
            return RefreshOutcome::Superseded { sequence, latest };
        }

        info!(
            sequence,
            records = frame.records.len(),
            routes = frame.popular_routes.len(),
            flights = %frame.origins.flights,
            insights = %frame.origins.insights,
            trends = %frame.origins.trends,
            "Dashboard refreshed"
        );

        *state = DashboardSnapshot {
            records: frame.records,
            insights: frame.insights,
            popular_routes: frame.popular_routes,
            price_trends: frame.price_trends,
            summary: frame.summary,
            origins: frame.origins,
            applied_sequence: sequence,
            refreshed_at: Some(Utc::now()),
            indicator: Indicator::Idle,
        };

        RefreshOutcome::Applied { sequence }
    }
}
