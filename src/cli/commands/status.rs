//! Status Command
//!
//! Show which external services will be called live and which fall back to
//! generated data.

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{OutputFormat, load_config};
use crate::dashboard::{ApiStatus, Dashboard};
use crate::types::{PulseError, Result};

pub fn run(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let status = Dashboard::from_config(&config)?.api_status();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&status).map_err(PulseError::Json)?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text(&status),
    }

    Ok(())
}

fn print_text(status: &ApiStatus) {
    let output = Output::new();

    println!("FlightPulse API Status");
    println!("══════════════════════════════════════");
    output.service("Insights (OpenAI)", status.insights);
    output.service("Flights (Aviationstack)", status.flights);
    output.service("Market (Alpha Vantage)", status.market);
    println!();

    if status.demo_mode {
        output.info("Demo mode: every collection uses generated data");
        println!("  Set OPENAI_API_KEY, AVIATIONSTACK_API_KEY or ALPHAVANTAGE_API_KEY");
        println!("  (or the [credentials] section) to enable live sources.");
    } else {
        output.success("Live sources configured");
    }
}
