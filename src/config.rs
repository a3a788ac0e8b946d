//! Configuration management for the house price predictor
//!
//! Price tier thresholds and the model artifact location are fixed and
//! intentionally absent here.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which front end drives the prediction pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrontendMode {
    /// Interactive terminal form
    #[default]
    Form,
    /// NATS request/reply valuation service
    Service,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub frontend: FrontendConfig,
    pub nats: NatsConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Front end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// "form" or "service"
    #[serde(default)]
    pub mode: FrontendMode,
}

/// NATS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming valuation requests
    pub request_subject: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between metrics summaries in service mode
    pub report_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path, layered over the defaults.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to serialize default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frontend: FrontendConfig {
                mode: FrontendMode::Form,
            },
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "valuations.requests".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            metrics: MetricsConfig {
                report_interval_secs: 30,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.frontend.mode, FrontendMode::Form);
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.request_subject, "valuations.requests");
        assert_eq!(config.metrics.report_interval_secs, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.frontend.mode, FrontendMode::Form);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[frontend]\nmode = \"service\"\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();

        assert_eq!(config.frontend.mode, FrontendMode::Service);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        // Untouched sections keep their defaults
        assert_eq!(config.nats.request_subject, "valuations.requests");
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/config.toml");
        let config = AppConfig::load_from_path(path).unwrap();
        assert_eq!(config.frontend.mode, FrontendMode::Form);
    }
}
