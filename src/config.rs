//! Configuration file handling with TOML support.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Where tickers come from when the command line does not say
    #[serde(default)]
    pub tickers: TickersConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Auto-refresh interval in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: f64,

    /// API timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_refresh_interval() -> f64 {
    60.0
}
fn default_timeout() -> u64 {
    10
}

/// Ticker source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TickersConfig {
    /// Ticker file, one symbol per line
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Explicit symbols; take precedence over `file`
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show summary header
    #[serde(default = "default_true")]
    pub show_header: bool,

    /// Show the details pane next to the table
    #[serde(default = "default_true")]
    pub show_details: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_header: true,
            show_details: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from default location or fall back to defaults.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        warn!("Failed to load config, using defaults: {:#}", e);
                    }
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tickrs").join("config.toml"))
    }
}

/// Generate a sample configuration file content.
pub fn sample_config() -> &'static str {
    r##"# tickrs configuration file

[general]
# Auto-refresh interval in seconds (interactive mode)
refresh_interval = 60.0
# API timeout in seconds
timeout = 10

[tickers]
# File with one symbol per line; blank lines and '#' comments are ignored
file = "tickers.txt"
# Or list symbols directly (wins over `file`)
# symbols = ["AAPL", "MSFT", "GOOG"]

[display]
# Show summary header
show_header = true
# Show the details pane for the highlighted row
show_details = true
"##
}
