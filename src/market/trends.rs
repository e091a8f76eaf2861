//! Market Trend Service
//!
//! Daily price series for the trend chart. Live mode reads the closing price
//! of a travel-industry ticker; otherwise a 30-day synthetic series ending
//! today is generated.

use std::sync::Mutex;

use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

use super::fallback::{Resolution, resolve};
use super::flights::session_rng;
use crate::constants::market::{
    AVERAGE_LABEL, INDEX_LABEL, INDEX_SYMBOL, MOCK_PRICE_MAX, MOCK_PRICE_MIN, TREND_DAYS,
};
use crate::provider::{DailySeries, SharedMarketSource};
use crate::types::{PriceTrend, SourceError, SourceResult};

pub struct MarketTrendService {
    source: Option<SharedMarketSource>,
    rng: Mutex<StdRng>,
}

impl MarketTrendService {
    pub fn new(source: Option<SharedMarketSource>, seed: Option<u64>) -> Self {
        Self {
            source,
            // offset so a shared seed doesn't mirror the record generator
            rng: Mutex::new(session_rng(seed.map(|s| s.wrapping_add(1)))),
        }
    }

    /// Daily trend points, oldest first; never fails
    pub async fn fetch_market_trends(&self) -> Vec<PriceTrend> {
        self.fetch().await.into_value()
    }

    /// Trend points together with their provenance
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Resolution<Vec<PriceTrend>> {
        let live = self.fetch_live().await;
        resolve("market trends", live, || {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            mock_trends(&mut *rng, Utc::now().date_naive())
        })
    }

    async fn fetch_live(&self) -> SourceResult<Vec<PriceTrend>> {
        let Some(source) = &self.source else {
            return Err(SourceError::credential_missing("market index"));
        };

        let series = source.daily_series(INDEX_SYMBOL).await?;
        let trends = series_to_trends(source.name(), &series)?;

        info!(
            points = trends.len(),
            symbol = INDEX_SYMBOL,
            "Fetched market index"
        );
        Ok(trends)
    }
}

/// The most recent 30 closes, oldest first
pub fn series_to_trends(
    source: &'static str,
    series: &DailySeries,
) -> SourceResult<Vec<PriceTrend>> {
    // BTreeMap keys are ISO dates, so iteration order is chronological
    let skip = series.len().saturating_sub(TREND_DAYS);

    series
        .iter()
        .skip(skip)
        .map(|(day, quote)| {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| SourceError::malformed(source, format!("date '{}': {}", day, e)))?;
            let price = quote.close.trim().parse::<f64>().map_err(|e| {
                SourceError::malformed(source, format!("close '{}': {}", quote.close, e))
            })?;

            Ok(PriceTrend {
                date,
                price,
                route: INDEX_LABEL.to_string(),
            })
        })
        .collect()
}

/// Synthetic series: one point per day for the 30 days ending `today`
pub fn mock_trends<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Vec<PriceTrend> {
    let mut trends: Vec<PriceTrend> = (0..TREND_DAYS as u64)
        .map(|days_ago| PriceTrend {
            date: today - Days::new(days_ago),
            price: rng.random_range(MOCK_PRICE_MIN..MOCK_PRICE_MAX),
            route: AVERAGE_LABEL.to_string(),
        })
        .collect();

    trends.reverse();
    trends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::fallback::DataOrigin;
    use crate::provider::{DailyQuote, MarketIndexSource};
    use crate::types::FailureKind;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use std::sync::Arc;

    struct MockIndexSource {
        series: SourceResult<DailySeries>,
    }

    #[async_trait]
    impl MarketIndexSource for MockIndexSource {
        async fn daily_series(&self, symbol: &str) -> SourceResult<DailySeries> {
            assert_eq!(symbol, "UAL");
            self.series.clone()
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn series(days: u32) -> DailySeries {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        (0..days)
            .map(|i| {
                let day = start + Days::new(u64::from(i));
                let quote = DailyQuote {
                    close: format!("{}.50", 40 + i),
                };
                (day.format("%Y-%m-%d").to_string(), quote)
            })
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_mock_series_spans_thirty_days() {
        let trends = mock_trends(&mut StdRng::seed_from_u64(5), today());

        assert_eq!(trends.len(), 30);
        assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2026, 9, 20).unwrap());
        assert_eq!(trends[29].date, today());
        assert!(trends.windows(2).all(|w| w[0].date < w[1].date));
        for point in &trends {
            assert!(point.price >= 300.0 && point.price < 700.0);
            assert_eq!(point.route, "Market Average");
        }
    }

    #[test]
    fn test_live_series_keeps_latest_thirty() {
        let trends = series_to_trends("mock", &series(45)).unwrap();

        assert_eq!(trends.len(), 30);
        assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2026, 8, 16).unwrap());
        assert_eq!(trends[0].price, 55.5);
        assert_eq!(trends[29].price, 84.5);
        assert!(trends.iter().all(|t| t.route == "Market Index"));
    }

    #[test]
    fn test_short_series_kept_whole() {
        let trends = series_to_trends("mock", &series(4)).unwrap();
        assert_eq!(trends.len(), 4);
    }

    #[test]
    fn test_unparseable_close_is_malformed() {
        let mut bad = series(3);
        bad.insert(
            "2026-08-10".to_string(),
            DailyQuote {
                close: "n/a".to_string(),
            },
        );
        let err = series_to_trends("mock", &bad).unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_unconfigured_source_synthesizes() {
        let service = MarketTrendService::new(None, Some(11));
        let resolution = service.fetch().await;

        assert_eq!(
            resolution.origin(),
            DataOrigin::Fallback {
                reason: FailureKind::CredentialMissing
            }
        );
        let trends = resolution.into_value();
        assert_eq!(trends.len(), 30);
        assert_eq!(trends[29].date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_live_series_used() {
        let source = Arc::new(MockIndexSource {
            series: Ok(series(10)),
        });
        let service = MarketTrendService::new(Some(source), None);

        let resolution = service.fetch().await;
        assert!(resolution.is_live());
        assert_eq!(resolution.value().len(), 10);
    }

    #[tokio::test]
    async fn test_rate_limited_source_falls_back() {
        let source = Arc::new(MockIndexSource {
            series: Err(SourceError::malformed("mock", "missing daily series")),
        });
        let service = MarketTrendService::new(Some(source), Some(2));

        let trends = service.fetch_market_trends().await;
        assert_eq!(trends.len(), 30);
        assert!(trends.iter().all(|t| t.route == "Market Average"));
    }
}
