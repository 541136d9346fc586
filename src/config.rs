//! Configuration management for the downloader.
//!
//! Loads configuration from TOML files, falling back to built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./config.toml`
    /// 2. `~/.config/stock-downloader/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        // Try current directory first
        if let Ok(config) = Self::load("config.toml") {
            return config;
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("stock-downloader").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        // Return defaults
        Self::default()
    }
}

/// General application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Ticker preselected in the form on startup.
    pub default_symbol: String,
    /// Tickers offered in the dropdown list.
    pub symbols: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_symbol: "AAPL".to_string(),
            symbols: [
                "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "ORCL", "IBM", "ADBE",
                "INTC", "CSCO", "AMD", "PYPL", "CRM",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Chart rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Rendered chart width in pixels.
    pub width: u32,
    /// Rendered chart height in pixels.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.default_symbol, "AAPL");
        assert_eq!(config.general.symbols.len(), 15);
        assert_eq!(config.general.symbols[0], "AAPL");
        assert_eq!(config.chart.width, 960);
        assert_eq!(config.chart.height, 540);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[general]
default_symbol = "IBM"
symbols = ["IBM", "ORCL"]

[chart]
width = 640
height = 360
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.general.default_symbol, "IBM");
        assert_eq!(config.general.symbols, vec!["IBM", "ORCL"]);
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 360);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
[general]
default_symbol = "TSLA"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.general.default_symbol, "TSLA");
        assert_eq!(config.general.symbols.len(), 15);
        assert_eq!(config.chart.width, 960);
    }
}
