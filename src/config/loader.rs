//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/flightpulse/config.toml)
//! 3. Project config (.flightpulse/config.toml)
//! 4. Environment variables (FLIGHTPULSE_* prefix, `__` separates sections)
//! 5. Conventional provider keys (OPENAI_API_KEY, AVIATIONSTACK_API_KEY, ALPHAVANTAGE_API_KEY)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{PulseError, Result};

/// Provider key variables and the credential each one fills
const PROVIDER_KEY_VARS: [(&str, &str); 3] = [
    ("OPENAI_API_KEY", "credentials.text_gen"),
    ("AVIATIONSTACK_API_KEY", "credentials.flight_data"),
    ("ALPHAVANTAGE_API_KEY", "credentials.market_index"),
];

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        Self::extract(Self::with_env(figment))
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(PulseError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));

        Self::extract(Self::with_env(figment))
    }

    fn with_env(figment: Figment) -> Figment {
        // e.g. FLIGHTPULSE_INSIGHTS__MODEL -> insights.model
        let mut figment = figment.merge(Env::prefixed("FLIGHTPULSE_").split("__"));

        for (var, key) in PROVIDER_KEY_VARS {
            figment = figment.merge(Env::raw().only(&[var]).map(move |_| key.into()));
        }

        figment
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| PulseError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/flightpulse/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("flightpulse"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".flightpulse")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration (credentials are never included)
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| PulseError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            PulseError::Config("Cannot determine global config directory".to_string())
        })?;

        Self::write_default(&global_dir, force)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::write_default(&Self::project_dir(), force)
    }

    fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# FlightPulse Configuration
# Project settings in .flightpulse/config.toml override global defaults.

version = "1.0"

# Leave a key unset to use mock data for that source.
# OPENAI_API_KEY, AVIATIONSTACK_API_KEY and ALPHAVANTAGE_API_KEY are also honored.
[credentials]
# text_gen = ""
# flight_data = ""
# market_index = ""

[insights]
model = "gpt-3.5-turbo"
temperature = 0.7
max_tokens = 800

[generator]
record_count = 200
# seed = 42
simulated_latency_ms = 0

[network]
timeout_secs = 30

[dashboard]
# "market" (index series) or "records" (first records of the batch)
trend_source = "market"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrendSource;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_template_parses() {
        let parsed: Config = toml::from_str(&ConfigLoader::default_config()).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.insights.max_tokens, 800);
        assert!(parsed.credentials.text_gen().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[generator]
record_count = 50
seed = 7

[dashboard]
trend_source = "records"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.generator.record_count, 50);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.dashboard.trend_source, TrendSource::Records);
        assert_eq!(config.insights.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ConfigLoader::load_from_file(Path::new("/nonexistent/flightpulse.toml"));
        assert!(matches!(result, Err(PulseError::Config(_))));
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[network]\ntimeout_secs = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_write_default_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("cfg");

        let path = ConfigLoader::write_default(&dir, false).unwrap();
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::write_default(&dir, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::write_default(&dir, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[generator]"));
    }

    #[test]
    fn test_render_omits_credentials() {
        let mut config = Config::default();
        config.credentials.market_index = Some("av-secret".to_string());

        let toml_out = ConfigLoader::render(&config, false).unwrap();
        let json_out = ConfigLoader::render(&config, true).unwrap();
        assert!(!toml_out.contains("av-secret"));
        assert!(!json_out.contains("av-secret"));
        assert!(toml_out.contains("[generator]"));
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FLIGHTPULSE_INSIGHTS__MODEL", "test-model");
            jail.set_env("ALPHAVANTAGE_API_KEY", "av-key");
            jail.create_file("config.toml", "[generator]\nrecord_count = 10\n")?;

            let config = ConfigLoader::load_from_file(Path::new("config.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.insights.model, "test-model");
            assert_eq!(config.generator.record_count, 10);
            assert_eq!(config.credentials.market_index(), Some("av-key"));
            Ok(())
        });
    }
}
