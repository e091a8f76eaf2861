//! Global Constants
//!
//! Centralized constants for record generation, aggregation and the external
//! market data providers. All magic numbers should be defined here.

/// Synthetic record generation
pub mod generator {
    /// Cities served by the synthetic market
    pub const CITIES: [&str; 7] = [
        "Sydney",
        "Melbourne",
        "Brisbane",
        "Perth",
        "Adelaide",
        "Darwin",
        "Hobart",
    ];

    /// Carriers operating in the synthetic market
    pub const AIRLINES: [&str; 5] = [
        "Qantas",
        "Virgin Australia",
        "Jetstar",
        "Rex Airlines",
        "Tigerair",
    ];

    /// Default number of records per synthetic batch
    pub const DEFAULT_RECORD_COUNT: usize = 200;

    /// Base fare range before the demand multiplier is applied
    pub const BASE_PRICE_MIN: f64 = 200.0;
    pub const BASE_PRICE_MAX: f64 = 1000.0;

    /// Demand multiplier range (demand score = multiplier x 100)
    pub const DEMAND_MULTIPLIER_MIN: f64 = 0.5;
    pub const DEMAND_MULTIPLIER_MAX: f64 = 2.0;

    /// Bookings range per record
    pub const BOOKINGS_MIN: f64 = 50.0;
    pub const BOOKINGS_MAX: f64 = 550.0;

    /// Departure dates fall within this many days from now
    pub const DEPARTURE_WINDOW_DAYS: i64 = 30;
}

/// Aggregation limits
pub mod aggregation {
    /// Routes retained in the popularity ranking
    pub const MAX_POPULAR_ROUTES: usize = 8;

    /// Records sampled for the record-based price trend
    pub const PRICE_TREND_SAMPLE: usize = 15;

    /// Routes listed in the insight prompt
    pub const PROMPT_TOP_ROUTES: usize = 3;
}

/// Market index series
pub mod market {
    /// Ticker used as a travel-industry proxy
    pub const INDEX_SYMBOL: &str = "UAL";

    /// Daily points kept from the index (and synthesized when unavailable)
    pub const TREND_DAYS: usize = 30;

    /// Synthetic market average price range
    pub const MOCK_PRICE_MIN: f64 = 300.0;
    pub const MOCK_PRICE_MAX: f64 = 700.0;

    /// Label for live index points
    pub const INDEX_LABEL: &str = "Market Index";

    /// Label for synthesized points
    pub const AVERAGE_LABEL: &str = "Market Average";
}

/// External flight schedule provider
pub mod flights {
    /// Canonical domestic route pairs queried in live mode (departure, arrival)
    pub const ROUTE_PAIRS: [(&str, &str); 5] = [
        ("SYD", "MEL"),
        ("MEL", "BNE"),
        ("SYD", "BNE"),
        ("PER", "SYD"),
        ("ADL", "MEL"),
    ];

    /// Flights requested per route
    pub const FLIGHTS_PER_ROUTE: u32 = 20;

    /// Fallback departure airport when the payload omits one
    pub const DEFAULT_DEPARTURE: &str = "SYD";

    /// Fallback arrival airport when the payload omits one
    pub const DEFAULT_ARRIVAL: &str = "MEL";

    /// Airline name used when the payload omits one
    pub const UNKNOWN_AIRLINE: &str = "Unknown Airline";

    /// IATA code to city name
    pub const AIRPORT_CITIES: [(&str, &str); 7] = [
        ("SYD", "Sydney"),
        ("MEL", "Melbourne"),
        ("BNE", "Brisbane"),
        ("PER", "Perth"),
        ("ADL", "Adelaide"),
        ("DRW", "Darwin"),
        ("HBA", "Hobart"),
    ];
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default OpenAI-compatible API base
    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

    /// Default Aviationstack API base
    pub const AVIATIONSTACK_API_BASE: &str = "http://api.aviationstack.com/v1";

    /// Default Alpha Vantage query endpoint
    pub const ALPHAVANTAGE_API_BASE: &str = "https://www.alphavantage.co/query";
}
