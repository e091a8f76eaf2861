//! Market data pipeline
//!
//! Source services that always produce data (live or substituted) and the pure
//! aggregation that turns a record batch into dashboard views.

pub mod aggregate;
pub mod fallback;
pub mod flights;
pub mod generator;
pub mod insights;
pub mod trends;

pub use aggregate::{compute_popular_routes, compute_price_trends};
pub use fallback::{DataOrigin, Resolution};
pub use flights::FlightDataService;
pub use generator::generate_records;
pub use insights::{InsightResolver, fallback_insights};
pub use trends::MarketTrendService;
