//! Synthetic Record Generator
//!
//! Produces randomized flight records for the mock market. The random source
//! is always passed in, so a seeded `StdRng` reproduces a batch exactly.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::constants::generator::{
    AIRLINES, BASE_PRICE_MAX, BASE_PRICE_MIN, BOOKINGS_MAX, BOOKINGS_MIN, CITIES,
    DEMAND_MULTIPLIER_MAX, DEMAND_MULTIPLIER_MIN, DEPARTURE_WINDOW_DAYS,
};
use crate::types::FlightRecord;

/// Price, demand and bookings drawn from the mock market formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketEstimate {
    pub price: f64,
    pub demand: u32,
    pub bookings: u32,
}

/// Draw the commercial fields of one record.
///
/// `price = round(base × multiplier)`, `demand = round(multiplier × 100)`,
/// `bookings = round(uniform[50, 550))`.
pub fn estimate_market<R: Rng + ?Sized>(rng: &mut R) -> MarketEstimate {
    let base_price = rng.random_range(BASE_PRICE_MIN..BASE_PRICE_MAX);
    let multiplier = rng.random_range(DEMAND_MULTIPLIER_MIN..DEMAND_MULTIPLIER_MAX);
    let bookings = rng.random_range(BOOKINGS_MIN..BOOKINGS_MAX);

    MarketEstimate {
        price: (base_price * multiplier).round(),
        demand: (multiplier * 100.0).round() as u32,
        bookings: bookings.round() as u32,
    }
}

/// Generate `count` records departing within the next 30 days of `now`
pub fn generate_records<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<FlightRecord> {
    (0..count).map(|i| generate_record(rng, i, now)).collect()
}

fn generate_record<R: Rng + ?Sized>(
    rng: &mut R,
    index: usize,
    now: DateTime<Utc>,
) -> FlightRecord {
    let origin = pick(rng, &CITIES);
    let mut destination = pick(rng, &CITIES);
    while destination == origin {
        destination = pick(rng, &CITIES);
    }

    let estimate = estimate_market(rng);

    FlightRecord {
        id: format!("flight-{}", index),
        origin: origin.to_string(),
        destination: destination.to_string(),
        price: estimate.price,
        date: random_departure(rng, now),
        airline: pick(rng, &AIRLINES).to_string(),
        demand: estimate.demand,
        bookings: estimate.bookings,
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

fn random_departure<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    let window_ms = Duration::days(DEPARTURE_WINDOW_DAYS).num_milliseconds();
    now + Duration::milliseconds(rng.random_range(0..window_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_seeded_batches_are_identical() {
        let a = generate_records(&mut StdRng::seed_from_u64(42), 50, fixed_now());
        let b = generate_records(&mut StdRng::seed_from_u64(42), 50, fixed_now());
        assert_eq!(a, b);

        let c = generate_records(&mut StdRng::seed_from_u64(43), 50, fixed_now());
        assert_ne!(a, c);
    }

    #[test]
    fn test_record_ids_follow_position() {
        let records = generate_records(&mut StdRng::seed_from_u64(1), 3, fixed_now());
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["flight-0", "flight-1", "flight-2"]);
    }

    #[test]
    fn test_fields_within_ranges() {
        let now = fixed_now();
        let records = generate_records(&mut StdRng::seed_from_u64(7), 200, now);
        assert_eq!(records.len(), 200);

        for record in &records {
            assert!(CITIES.contains(&record.origin.as_str()));
            assert!(CITIES.contains(&record.destination.as_str()));
            assert!(AIRLINES.contains(&record.airline.as_str()));
            // 200 × 0.5 .. 1000 × 2.0
            assert!(record.price >= 100.0 && record.price <= 2000.0);
            assert_eq!(record.price, record.price.round());
            assert!((50..=200).contains(&record.demand));
            assert!((50..=550).contains(&record.bookings));
            assert!(record.date >= now);
            assert!(record.date < now + Duration::days(30));
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(generate_records(&mut StdRng::seed_from_u64(0), 0, fixed_now()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_destination_never_equals_origin(seed in any::<u64>()) {
            let records = generate_records(&mut StdRng::seed_from_u64(seed), 100, fixed_now());
            for record in records {
                prop_assert_ne!(record.origin, record.destination);
            }
        }

        #[test]
        fn prop_demand_tracks_price_multiplier(seed in any::<u64>()) {
            let estimate = estimate_market(&mut StdRng::seed_from_u64(seed));
            // demand = round(multiplier × 100), price = round(base × multiplier), base ∈ [200, 1000)
            let multiplier = f64::from(estimate.demand) / 100.0;
            prop_assert!(estimate.price <= (1000.0 * (multiplier + 0.005)).ceil());
            prop_assert!(estimate.price >= (200.0 * (multiplier - 0.005)).floor());
        }
    }
}
