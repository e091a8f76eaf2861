//! Aggregation Engine
//!
//! Pure functions deriving the dashboard views from a record batch. No I/O,
//! no suspension; calling any of them twice on the same input yields the same
//! output.
//!
//! Grouping keeps first-encounter order so that ties in the rankings are
//! broken by the order routes first appear in the batch.

use std::collections::{HashMap, HashSet};

use crate::constants::aggregation::{MAX_POPULAR_ROUTES, PRICE_TREND_SAMPLE};
use crate::types::{FlightRecord, MarketSummary, PriceTrend, RoutePopularity};

#[derive(Default)]
struct RouteTotals {
    bookings: u64,
    price: f64,
    demand: u64,
    count: u32,
}

/// Rank directed routes by total bookings, keeping the top 8.
///
/// Each entry carries the rounded mean price and mean demand of its group.
pub fn compute_popular_routes(records: &[FlightRecord]) -> Vec<RoutePopularity> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<((&str, &str), RouteTotals)> = Vec::new();

    for record in records {
        let key = (record.origin.as_str(), record.destination.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, RouteTotals::default()));
            groups.len() - 1
        });

        let totals = &mut groups[slot].1;
        totals.bookings += u64::from(record.bookings);
        totals.price += record.price;
        totals.demand += u64::from(record.demand);
        totals.count += 1;
    }

    let mut routes: Vec<RoutePopularity> = groups
        .into_iter()
        .map(|((origin, destination), totals)| {
            // groups only exist for observed records, so count >= 1
            let count = f64::from(totals.count);
            RoutePopularity {
                route: format!("{} → {}", origin, destination),
                bookings: totals.bookings,
                avg_price: (totals.price / count).round() as u64,
                demand_score: (totals.demand as f64 / count).round() as u32,
            }
        })
        .collect();

    // sort_by is stable: equal bookings keep encounter order
    routes.sort_by(|a, b| b.bookings.cmp(&a.bookings));
    routes.truncate(MAX_POPULAR_ROUTES);
    routes
}

/// Price series from the first 15 records of the batch, ascending by day
pub fn compute_price_trends(records: &[FlightRecord]) -> Vec<PriceTrend> {
    let mut trends: Vec<PriceTrend> = records
        .iter()
        .take(PRICE_TREND_SAMPLE)
        .map(|record| PriceTrend {
            date: record.date.date_naive(),
            price: record.price,
            route: record.route_key(),
        })
        .collect();

    trends.sort_by_key(|trend| trend.date);
    trends
}

impl MarketSummary {
    /// Headline numbers for a batch; all zero when the batch is empty
    pub fn from_records(records: &[FlightRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let count = records.len() as f64;
        let total_bookings = records.iter().map(|r| u64::from(r.bookings)).sum();
        let total_demand: u64 = records.iter().map(|r| u64::from(r.demand)).sum();
        let active_routes = records
            .iter()
            .map(|r| (r.origin.as_str(), r.destination.as_str()))
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_bookings,
            avg_price: mean_price(records).unwrap_or_default().round() as u64,
            avg_demand: (total_demand as f64 / count).round() as u32,
            active_routes,
        }
    }
}

/// Mean price of the batch, `None` when empty
pub fn mean_price(records: &[FlightRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(records.iter().map(|r| r.price).sum::<f64>() / records.len() as f64)
}

/// Lowest and highest price in the batch, `None` when empty
pub fn price_range(records: &[FlightRecord]) -> Option<(f64, f64)> {
    records.iter().map(|r| r.price).fold(None, |range, price| {
        Some(match range {
            None => (price, price),
            Some((min, max)) => (min.min(price), max.max(price)),
        })
    })
}

/// The `limit` most frequent `origin-destination` keys by record count.
///
/// Ties keep first-encounter order.
pub fn top_routes_by_frequency(records: &[FlightRecord], limit: usize) -> Vec<String> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for record in records {
        let key = record.route_key();
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(key, _)| key).collect()
}
