use std::fmt::Display;

use console::style;

use crate::dashboard::ServiceMode;

/// Styled terminal messages for command handlers
#[derive(Default)]
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: impl Display) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: impl Display) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: impl Display) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    /// One service row of the API status panel
    pub fn service(&self, label: &str, mode: ServiceMode) {
        let mode = match mode {
            ServiceMode::Live => style(mode.to_string()).green(),
            ServiceMode::Mock => style(mode.to_string()).yellow(),
        };
        println!("  {:<26} {}", style(format!("{}:", label)).dim(), mode);
    }
}
