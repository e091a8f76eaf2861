//! Config Command
//!
//! Manage FlightPulse configuration.
//!
//! Usage:
//!   flightpulse config show [-f json]
//!   flightpulse config path
//!   flightpulse config init [-g] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::load_config;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration (credentials omitted)
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let rendered = ConfigLoader::render(&config, format == "json")?;
    println!("{}", rendered);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let output = Output::new();

    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    output.success(format!("Initialized {} configuration", scope));
    println!("  Config: {}", path.display());
    Ok(())
}
