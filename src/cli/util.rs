//! CLI Common Utilities
//!
//! Shared configuration loading and output format parsing for command handlers.

use std::path::Path;

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Output format accepted by `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
        }
    }
}

/// Load configuration from an explicit file, or the layered chain when none is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
