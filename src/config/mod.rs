//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/flightpulse/config.toml)
//! 3. Project config (.flightpulse/config.toml)
//! 4. Environment variables (FLIGHTPULSE_* and conventional provider keys)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
