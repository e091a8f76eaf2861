//! Flight Data Service
//!
//! Source adapter producing the record batch for one refresh. Live mode fans
//! out one request per canonical route pair and maps the results; synthetic
//! mode generates a mock batch. `fetch_flight_data` never fails.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

use super::fallback::{Resolution, resolve};
use super::generator::{estimate_market, generate_records};
use crate::config::GeneratorConfig;
use crate::constants::flights::{
    AIRPORT_CITIES, DEFAULT_ARRIVAL, DEFAULT_DEPARTURE, ROUTE_PAIRS, UNKNOWN_AIRLINE,
};
use crate::provider::{ExternalFlight, RoutePair, SharedFlightSource};
use crate::types::{FlightRecord, SourceError, SourceResult};

/// Build a seeded or entropy-backed random source
pub(crate) fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub struct FlightDataService {
    source: Option<SharedFlightSource>,
    record_count: usize,
    simulated_latency: Duration,
    rng: Mutex<StdRng>,
}

impl FlightDataService {
    pub fn new(source: Option<SharedFlightSource>, settings: &GeneratorConfig) -> Self {
        Self {
            source,
            record_count: settings.record_count,
            simulated_latency: Duration::from_millis(settings.simulated_latency_ms),
            rng: Mutex::new(session_rng(settings.seed)),
        }
    }

    /// Records for this refresh, live when possible, synthetic otherwise
    pub async fn fetch_flight_data(&self) -> Vec<FlightRecord> {
        self.fetch().await.into_value()
    }

    /// Records together with their provenance
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Resolution<Vec<FlightRecord>> {
        let live = self.fetch_live().await;
        let resolution = resolve("flight data", live, || self.generate());

        if !resolution.is_live() && !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }

        resolution
    }

    async fn fetch_live(&self) -> SourceResult<Vec<FlightRecord>> {
        let Some(source) = &self.source else {
            return Err(SourceError::credential_missing("flight data"));
        };

        let requests = ROUTE_PAIRS.iter().map(|&(departure, arrival)| {
            source.fetch_route(RoutePair {
                departure,
                arrival,
            })
        });

        // any failed route fails the whole batch
        let pages = try_join_all(requests).await?;
        let flights: Vec<ExternalFlight> = pages.into_iter().flatten().collect();

        info!(
            flights = flights.len(),
            source = source.name(),
            "Fetched live flight data"
        );

        Ok(self.transform(flights, Utc::now()))
    }

    fn generate(&self) -> Vec<FlightRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        generate_records(&mut *rng, self.record_count, Utc::now())
    }

    /// Map external flights into records; commercial fields are estimated
    fn transform(&self, flights: Vec<ExternalFlight>, now: DateTime<Utc>) -> Vec<FlightRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        flights
            .into_iter()
            .enumerate()
            .map(|(index, flight)| {
                let departure = flight
                    .departure
                    .and_then(|a| a.iata)
                    .unwrap_or_else(|| DEFAULT_DEPARTURE.to_string());
                let arrival = flight
                    .arrival
                    .and_then(|a| a.iata)
                    .unwrap_or_else(|| DEFAULT_ARRIVAL.to_string());
                let estimate = estimate_market(&mut *rng);

                FlightRecord {
                    id: format!("flight-{}", index),
                    origin: airport_city(&departure),
                    destination: airport_city(&arrival),
                    price: estimate.price,
                    date: flight
                        .flight_date
                        .as_deref()
                        .and_then(parse_flight_date)
                        .unwrap_or(now),
                    airline: flight
                        .airline
                        .and_then(|a| a.name)
                        .unwrap_or_else(|| UNKNOWN_AIRLINE.to_string()),
                    demand: estimate.demand,
                    bookings: estimate.bookings,
                }
            })
            .collect()
    }
}

/// City for an IATA code; unknown codes pass through unchanged
pub fn airport_city(iata: &str) -> String {
    AIRPORT_CITIES
        .iter()
        .find(|(code, _)| *code == iata)
        .map(|(_, city)| city.to_string())
        .unwrap_or_else(|| iata.to_string())
}

/// Accepts a bare `YYYY-MM-DD` day (midnight UTC) or an RFC 3339 timestamp
fn parse_flight_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
