//! Configuration module
//!
//! TOML application config, read from
//! `~/.config/texnouz-booking/config.toml` or the path in
//! `BOOKING_CONFIG`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::shared::errors::InfraError;

/// Full application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// REST API port
    pub port: u16,
    /// Prometheus exporter port. 0 disables the exporter
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            metrics_port: 9464,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path, used when `url` is not set
    pub path: String,
    /// Full connection URL; overrides `path`
    pub url: Option<String>,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}?mode=rwc", self.path))
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "./booking.db".to_string(),
            url: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter, e.g. "info" or "texnouz_booking=debug,info"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Booking core configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Stale-booking sweep interval in seconds
    pub sweep_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&raw).map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Default config file location: `<config_dir>/texnouz-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("texnouz-booking")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.database.connection_url(), "sqlite://./booking.db?mode=rwc");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.booking.sweep_interval_secs, 300);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [database]
            url = "sqlite::memory:"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.connection_url(), "sqlite::memory:");
        assert_eq!(cfg.booking.sweep_interval_secs, 300);
    }
}
