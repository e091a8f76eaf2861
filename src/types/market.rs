//! Market data model
//!
//! Records and the views derived from them. Everything here is immutable once
//! built; views are recomputed from scratch on every refresh.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One flight booking observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub airline: String,
    /// Synthetic 0-100-ish intensity score, not a count
    pub demand: u32,
    pub bookings: u32,
}

impl FlightRecord {
    /// Display label used by the popularity ranking ("Sydney → Melbourne")
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }

    /// Compact label used by trends and prompts ("Sydney-Melbourne")
    pub fn route_key(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}

/// Aggregated bookings for one directed route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePopularity {
    pub route: String,
    pub bookings: u64,
    pub avg_price: u64,
    pub demand_score: u32,
}

/// One point of a price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub date: NaiveDate,
    pub price: f64,
    pub route: String,
}

/// Qualitative statement about market behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInsight {
    pub category: String,
    pub insight: String,
    pub impact: Impact,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::High => write!(f, "high"),
            Impact::Medium => write!(f, "medium"),
            Impact::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Headline numbers shown above the charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub total_bookings: u64,
    pub avg_price: u64,
    pub avg_demand: u32,
    /// Distinct directed origin-destination pairs
    pub active_routes: usize,
}
