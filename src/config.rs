//! Application configuration.
//! Optional JSON file, every field defaulted, plus environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LISTING_CHARTS_CONFIG";
/// Environment variable overriding the CSV path.
pub const CSV_ENV: &str = "LISTING_CHARTS_CSV";
/// Config file looked up in the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "listing_charts.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub window_title: String,
    pub font_size: f32,
    pub export_width: u32,
    pub export_height: u32,
    /// Menu label selected when the window opens.
    pub initial_chart: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("AB_NYC_2019.csv"),
            window_title: "New York City Airbnb Plots".to_string(),
            font_size: 20.0,
            export_width: 1600,
            export_height: 1000,
            initial_chart: None,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Resolve the configuration for this process.
    ///
    /// An explicit `LISTING_CHARTS_CONFIG` must exist; the default file is
    /// only read when present. `LISTING_CHARTS_CSV` wins over both.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("Reading config from {}", path.display());
                Self::from_file(&path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                log::info!("Reading config from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                log::debug!("No config file, using defaults");
                Self::default()
            }
        };

        if let Some(csv) = std::env::var_os(CSV_ENV) {
            config.csv_path = PathBuf::from(csv);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(r#"{ "font_size": 14.0, "csv_path": "data/listings.csv" }"#)
            .unwrap();
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.csv_path, PathBuf::from("data/listings.csv"));
        assert_eq!(config.window_title, "New York City Airbnb Plots");
        assert_eq!(config.export_width, 1600);
        assert!(config.initial_chart.is_none());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(AppConfig::from_json_str("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = AppConfig::from_json_str(r#"{ "font_size": "big" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_chart": "Kde Plot- Price Density" }}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.initial_chart.as_deref(),
            Some("Kde Plot- Price Density")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/listing_charts.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
