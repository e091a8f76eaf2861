pub mod error;
pub mod market;

pub use error::{FailureKind, PulseError, Result, SourceError, SourceResult};
pub use market::{
    FlightRecord, Impact, MarketInsight, MarketSummary, PriceTrend, RoutePopularity, Trend,
};
