//! Dashboard Command
//!
//! Refresh the dashboard once and print it, or keep refreshing on an interval.
//!
//! Usage:
//!   flightpulse dashboard [--format json] [--seed N] [--records N] [--watch SECS]

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::cli::ui::{Output, render_dashboard};
use crate::cli::util::{OutputFormat, load_config};
use crate::dashboard::{Dashboard, RefreshOutcome};
use crate::types::{PulseError, Result};

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub seed: Option<u64>,
    pub records: Option<usize>,
    /// Refresh interval in seconds; `None` renders once
    pub watch: Option<u64>,
}

pub async fn run(options: DashboardOptions) -> Result<()> {
    let mut config = load_config(options.config_path.as_deref())?;
    if let Some(seed) = options.seed {
        config.generator.seed = Some(seed);
    }
    if let Some(records) = options.records {
        config.generator.record_count = records;
    }

    let dashboard = Dashboard::from_config(&config)?;
    let output = Output::new();

    if dashboard.api_status().demo_mode && options.format == OutputFormat::Text {
        output.info("Demo mode: no API keys configured, showing generated market data");
    }

    dashboard.refresh(false).await;
    print(&dashboard, options.format).await?;

    let Some(secs) = options.watch else {
        return Ok(());
    };

    let period = Duration::from_secs(secs.max(1));
    info!(interval_secs = period.as_secs(), "Watching dashboard, Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                output.success("Stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(period) => {
                match dashboard.refresh(true).await {
                    RefreshOutcome::Applied { .. } => print(&dashboard, options.format).await?,
                    RefreshOutcome::Superseded { .. } => {}
                    RefreshOutcome::Failed { sequence } => {
                        output.warning(format!(
                            "Refresh #{} failed, showing previous data",
                            sequence
                        ));
                    }
                }
            }
        }
    }
}

async fn print(dashboard: &Dashboard, format: OutputFormat) -> Result<()> {
    let snapshot = dashboard.snapshot().await;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&snapshot).map_err(PulseError::Json)?;
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", render_dashboard(&snapshot)),
    }
    Ok(())
}
