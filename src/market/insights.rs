//! Insight Resolver
//!
//! Summarizes the batch into a prompt, asks the text source for a JSON array
//! of insights and falls back to a canned set on any failure.

use tracing::{debug, instrument};

use super::aggregate::{mean_price, price_range, top_routes_by_frequency};
use super::fallback::{Resolution, resolve};
use crate::constants::aggregation::PROMPT_TOP_ROUTES;
use crate::provider::SharedInsightSource;
use crate::types::{FlightRecord, Impact, MarketInsight, SourceError, SourceResult, Trend};

pub struct InsightResolver {
    source: Option<SharedInsightSource>,
}

impl InsightResolver {
    pub fn new(source: Option<SharedInsightSource>) -> Self {
        Self { source }
    }

    /// Insights for the batch; never fails
    pub async fn generate_insights(&self, records: &[FlightRecord]) -> Vec<MarketInsight> {
        self.resolve(records).await.into_value()
    }

    /// Insights together with their provenance
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn resolve(&self, records: &[FlightRecord]) -> Resolution<Vec<MarketInsight>> {
        let live = self.request(records).await;
        resolve("insights", live, fallback_insights)
    }

    async fn request(&self, records: &[FlightRecord]) -> SourceResult<Vec<MarketInsight>> {
        let Some(source) = &self.source else {
            return Err(SourceError::credential_missing("insights"));
        };

        let prompt = build_prompt(records);
        debug!(chars = prompt.len(), "Built insight prompt");

        let reply = source.complete(&prompt).await?;
        parse_insights(source.name(), &reply)
    }
}

/// Prompt summarizing the batch for the text generator
pub fn build_prompt(records: &[FlightRecord]) -> String {
    let average = mean_price(records).unwrap_or_default().round();
    let (min, max) = price_range(records).unwrap_or_default();
    let top_routes = top_routes_by_frequency(records, PROMPT_TOP_ROUTES).join(", ");

    format!(
        r#"Analyze this airline booking data and provide 4 key market insights:

Data Summary:
- Total flights: {count}
- Average price: ${average}
- Top routes: {top_routes}
- Price range: ${min} - ${max}

Please provide insights in this JSON format:
[
  {{
    "category": "Peak Demand",
    "insight": "specific insight about demand patterns",
    "impact": "high|medium|low",
    "trend": "up|down|stable"
  }}
]

Focus on: demand trends, pricing patterns, popular routes, and seasonal factors."#,
        count = records.len(),
    )
}

/// Parse the generator's reply; markdown code fences are tolerated
pub fn parse_insights(source: &'static str, reply: &str) -> SourceResult<Vec<MarketInsight>> {
    let body = strip_code_fences(reply.trim().trim_start_matches('\u{feff}'));

    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        SourceError::malformed(source, format!("{} in reply: {}", e, preview))
    })
}

fn strip_code_fences(s: &str) -> &str {
    let mut body = s;

    // Remove ```json ... ``` or ``` ... ```
    if body.starts_with("```") {
        body = body.split_once('\n').map_or("", |(_, rest)| rest);
    }
    if let Some(stripped) = body.trim_end().strip_suffix("```") {
        body = stripped;
    }

    body.trim()
}

/// The canned insights shown whenever live generation is unavailable
pub fn fallback_insights() -> Vec<MarketInsight> {
    vec![
        MarketInsight {
            category: "Peak Demand".to_string(),
            insight: "Sydney-Melbourne route shows 35% higher demand during weekends".to_string(),
            impact: Impact::High,
            trend: Trend::Up,
        },
        MarketInsight {
            category: "Pricing Trends".to_string(),
            insight: "Average ticket prices increased 12% compared to last month".to_string(),
            impact: Impact::Medium,
            trend: Trend::Up,
        },
        MarketInsight {
            category: "Popular Routes".to_string(),
            insight: "Interstate routes dominate 68% of all bookings".to_string(),
            impact: Impact::High,
            trend: Trend::Stable,
        },
        MarketInsight {
            category: "Seasonal Patterns".to_string(),
            insight: "Tourism destinations see 40% booking spike approaching holidays".to_string(),
            impact: Impact::Medium,
            trend: Trend::Up,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::fallback::DataOrigin;
    use crate::provider::InsightTextSource;
    use crate::types::FailureKind;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    struct MockTextSource {
        reply: SourceResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockTextSource {
        fn replying(reply: SourceResult<String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl InsightTextSource for MockTextSource {
        async fn complete(&self, prompt: &str) -> SourceResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn record(origin: &str, destination: &str, price: f64) -> FlightRecord {
        FlightRecord {
            id: "flight-0".to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            price,
            date: Utc::now(),
            airline: "Rex Airlines".to_string(),
            demand: 90,
            bookings: 120,
        }
    }

    const LIVE_REPLY: &str = r#"[
        {"category": "Pricing", "insight": "Fares to Perth are softening", "impact": "low", "trend": "down"}
    ]"#;

    #[tokio::test]
    async fn test_fallback_is_deterministic_without_credential() {
        let resolver = InsightResolver::new(None);

        let first = resolver.generate_insights(&[]).await;
        let second = resolver
            .generate_insights(&[record("Sydney", "Perth", 400.0)])
            .await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        let categories: Vec<_> = first.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(
            categories,
            [
                "Peak Demand",
                "Pricing Trends",
                "Popular Routes",
                "Seasonal Patterns"
            ]
        );
    }

    #[tokio::test]
    async fn test_live_reply_parsed() {
        let source = MockTextSource::replying(Ok(LIVE_REPLY.to_string()));
        let resolver = InsightResolver::new(Some(source.clone()));

        let resolution = resolver
            .resolve(&[record("Sydney", "Perth", 400.0)])
            .await;
        assert!(resolution.is_live());

        let insights = resolution.into_value();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].impact, Impact::Low);
        assert_eq!(insights[0].trend, Trend::Down);

        let prompts = source.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Total flights: 1"));
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let source = MockTextSource::replying(Ok("Here are some thoughts: demand is up".to_string()));
        let resolver = InsightResolver::new(Some(source));

        let resolution = resolver.resolve(&[record("Perth", "Darwin", 300.0)]).await;
        assert_eq!(
            resolution.origin(),
            DataOrigin::Fallback {
                reason: FailureKind::MalformedResponse
            }
        );
        assert_eq!(resolution.into_value(), fallback_insights());
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        let source =
            MockTextSource::replying(Err(SourceError::transport("mock", "HTTP 401: bad key")));
        let resolver = InsightResolver::new(Some(source));

        let insights = resolver
            .generate_insights(&[record("Perth", "Darwin", 300.0)])
            .await;
        assert_eq!(insights, fallback_insights());
    }

    #[test]
    fn test_fenced_reply_parsed() {
        let fenced = format!("```json\n{}\n```", LIVE_REPLY);
        let insights = parse_insights("mock", &fenced).unwrap();
        assert_eq!(insights[0].category, "Pricing");
    }

    #[test]
    fn test_invalid_enum_is_malformed() {
        let reply = r#"[{"category":"x","insight":"y","impact":"severe","trend":"up"}]"#;
        let err = parse_insights("mock", reply).unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }

    #[test]
    fn test_prompt_summary() {
        let records = vec![
            record("Sydney", "Melbourne", 300.0),
            record("Perth", "Adelaide", 150.0),
            record("Sydney", "Melbourne", 451.0),
            record("Hobart", "Darwin", 99.0),
        ];

        let prompt = build_prompt(&records);
        assert!(prompt.contains("- Total flights: 4"));
        assert!(prompt.contains("- Average price: $250"));
        assert!(prompt.contains("- Top routes: Sydney-Melbourne, Perth-Adelaide, Hobart-Darwin"));
        assert!(prompt.contains("- Price range: $99 - $451"));
        assert!(prompt.contains(r#""impact": "high|medium|low""#));
    }

    #[test]
    fn test_prompt_for_empty_batch() {
        let prompt = build_prompt(&[]);
        assert!(prompt.contains("- Total flights: 0"));
        assert!(prompt.contains("- Average price: $0"));
        assert!(prompt.contains("- Price range: $0 - $0"));
    }
}
