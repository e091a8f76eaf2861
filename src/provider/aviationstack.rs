//! Aviationstack Provider
//!
//! Flight schedule source backed by the Aviationstack `/flights` endpoint.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ExternalFlight, FlightDataSource, RoutePair, build_client, send_json};
use crate::constants::flights::FLIGHTS_PER_ROUTE;
use crate::types::{Result, SourceResult};

const SOURCE: &str = "aviationstack";

pub struct AviationstackProvider {
    access_key: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AviationstackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AviationstackProvider")
            .field("access_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl AviationstackProvider {
    pub fn new(access_key: &str, api_base: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            access_key: SecretString::from(access_key.to_string()),
            api_base: api_base.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl FlightDataSource for AviationstackProvider {
    async fn fetch_route(&self, route: RoutePair) -> SourceResult<Vec<ExternalFlight>> {
        debug!(%route, "Requesting flights from Aviationstack");

        let limit = FLIGHTS_PER_ROUTE.to_string();
        let request = self
            .client
            .get(format!("{}/flights", self.api_base))
            .query(&[
                ("access_key", self.access_key.expose_secret()),
                ("dep_iata", route.departure),
                ("arr_iata", route.arrival),
                ("limit", limit.as_str()),
            ]);

        let page: FlightsPage = send_json(SOURCE, request).await?;
        Ok(page.data)
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

/// Response envelope; a missing `data` array counts as no flights
#[derive(Debug, Deserialize)]
struct FlightsPage {
    #[serde(default)]
    data: Vec<ExternalFlight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_without_data_is_empty() {
        let page: FlightsPage = serde_json::from_str(r#"{"pagination":{}}"#).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_page_with_flights() {
        let json = r#"{"data":[
            {"flight_date":"2026-04-02","departure":{"iata":"SYD"},"arrival":{"iata":"MEL"},"airline":{"name":"Qantas"}},
            {"flight_date":null}
        ]}"#;
        let page: FlightsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(
            page.data[0].airline.as_ref().and_then(|a| a.name.as_deref()),
            Some("Qantas")
        );
        assert!(page.data[1].departure.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider =
            AviationstackProvider::new("av-secret", "http://localhost/v1", Duration::from_secs(1))
                .unwrap();
        assert!(!format!("{:?}", provider).contains("av-secret"));
    }
}
