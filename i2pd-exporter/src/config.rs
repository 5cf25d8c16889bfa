//! Configuration for the i2pd exporter.

use std::path::Path;

use i2pd_common::LoggingConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] i2pd_common::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// i2pd web console settings.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Metrics HTTP endpoint settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how to scrape the i2pd web console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Console URL (default: "http://127.0.0.1:7070").
    #[serde(default = "default_console_url")]
    pub url: String,

    /// Request timeout in seconds (default: 5).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_console_url() -> String {
    "http://127.0.0.1:7070".to_string()
}

fn default_timeout() -> u64 {
    5
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: default_console_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Metrics HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to listen on (default: "0.0.0.0:9101").
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_listen() -> String {
    "0.0.0.0:9101".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: ExporterConfig = i2pd_common::load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = i2pd_common::parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.console.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        match Url::parse(&self.console.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Validation(format!(
                    "Unsupported console URL scheme: {}",
                    url.scheme()
                )));
            }
            Err(e) => {
                return Err(ConfigError::Validation(format!(
                    "Invalid console URL '{}': {}",
                    self.console.url, e
                )));
            }
        }

        // Validate listen address format
        if self.http.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.http.listen
            )));
        }

        // Validate path starts with /
        if !self.http.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "Metrics path must start with /".to_string(),
            ));
        }

        // The landing page and health check own these routes
        if matches!(self.http.path.as_str(), "/" | "/health") {
            return Err(ConfigError::Validation(format!(
                "Metrics path {} is reserved",
                self.http.path
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2pd_common::LogFormat;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_config() {
        let config = ExporterConfig::parse("{}").unwrap();

        assert_eq!(config.console.url, "http://127.0.0.1:7070");
        assert_eq!(config.console.timeout_secs, 5);
        assert_eq!(config.http.listen, "0.0.0.0:9101");
        assert_eq!(config.http.path, "/metrics");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            console: {
                url: "https://router.lan:7443/",
                timeout_secs: 2,
            },
            http: {
                listen: "127.0.0.1:9200",
                path: "/i2pd/metrics",
            },
            logging: {
                level: "debug",
                format: "json"
            }
        }"#;

        let config = ExporterConfig::parse(json).unwrap();

        assert_eq!(config.console.url, "https://router.lan:7443/");
        assert_eq!(config.console.timeout_secs, 2);
        assert_eq!(config.http.listen, "127.0.0.1:9200");
        assert_eq!(config.http.path, "/i2pd/metrics");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_default_matches_empty_config() {
        let parsed = ExporterConfig::parse("{}").unwrap();
        let default = ExporterConfig::default();

        assert_eq!(parsed.console.url, default.console.url);
        assert_eq!(parsed.http.listen, default.http.listen);
        assert!(default.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_listen() {
        let json = r#"{
            http: { listen: "not-an-address" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid listen address")
        );
    }

    #[test]
    fn test_validate_invalid_path() {
        let json = r#"{
            http: { path: "no-leading-slash" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("must start with /")
        );
    }

    #[test]
    fn test_validate_reserved_path() {
        let result = ExporterConfig::parse(r#"{ http: { path: "/" } }"#);
        assert!(result.unwrap_err().to_string().contains("is reserved"));

        let result = ExporterConfig::parse(r#"{ http: { path: "/health" } }"#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_invalid_url() {
        let result = ExporterConfig::parse(r#"{ console: { url: "127.0.0.1 7070" } }"#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let result = ExporterConfig::parse(r#"{ console: { url: "ftp://127.0.0.1/" } }"#);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported console URL scheme")
        );
    }

    #[test]
    fn test_validate_zero_timeout() {
        let json = r#"{
            console: { timeout_secs: 0 }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = ExporterConfig::parse("{ console: ");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ console: {{ url: "http://10.0.0.2:7070" }} }}"#).unwrap();

        let config = ExporterConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.console.url, "http://10.0.0.2:7070");
        assert_eq!(config.http.path, "/metrics");
    }
}
