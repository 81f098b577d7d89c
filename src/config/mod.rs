//! Configuration for the collector.

mod vars;

pub use vars::interpolate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::error::{ConfigError, EnvInterpolationSnafu, ReadFileSnafu, YamlParseSnafu};

#[derive(Parser, Debug)]
#[command(version, about = "Libvirt domain telemetry collector")]
pub struct CliArgs {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Delivery mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Timer loop over a long-lived connection, events to stdout.
    #[default]
    Poll,
    /// HTTP endpoint, one connection per request.
    Serve,
}

/// Hypervisor connection target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Libvirt connection URI (default: local system hypervisor).
    #[serde(default = "default_uri")]
    pub uri: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { uri: default_uri() }
    }
}

fn default_uri() -> String {
    "qemu:///system".to_string()
}

/// Listen address for serve mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the domain endpoint (default: "0.0.0.0:8088").
    #[serde(default = "default_server_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
        }
    }
}

fn default_server_address() -> String {
    "0.0.0.0:8088".to_string()
}

/// Metrics configuration for the Prometheus endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP server (default: "0.0.0.0:9090").
    #[serde(default = "default_metrics_address")]
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            address: default_metrics_address(),
        }
    }
}

fn default_metrics_address() -> String {
    "0.0.0.0:9090".to_string()
}

/// Top-level collector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Seconds between collection cycles (default: 30).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            connection: ConnectionConfig::default(),
            interval_secs: default_interval_secs(),
            server: ServerConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

fn default_interval_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration, falling back to defaults when no file is given.
    ///
    /// Environment variables are interpolated in the raw file before
    /// parsing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let raw = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
                let text = interpolate(&raw).map_err(|errors| {
                    EnvInterpolationSnafu {
                        message: errors.join("\n"),
                    }
                    .build()
                })?;
                serde_yaml::from_str(&text).context(YamlParseSnafu)?
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure!(self.interval_secs > 0, crate::error::ZeroIntervalSnafu);
        ensure!(
            !self.connection.uri.is_empty(),
            crate::error::EmptyConnectionUriSnafu
        );
        Ok(())
    }

    /// Collection interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.mode, Mode::Poll);
        assert_eq!(config.connection.uri, "qemu:///system");
        assert_eq!(config.interval(), Duration::from_secs(30));
        assert_eq!(config.server.address, "0.0.0.0:8088");
        assert_eq!(config.metrics.address, "0.0.0.0:9090");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
mode: serve
connection:
  uri: "qemu+ssh://host/system"
interval_secs: 10
server:
  address: "127.0.0.1:8089"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.mode, Mode::Serve);
        assert_eq!(config.connection.uri, "qemu+ssh://host/system");
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.server.address, "127.0.0.1:8089");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "intervall_secs: 10\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = Config {
            interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_empty_uri_rejected() {
        let config = Config {
            connection: ConnectionConfig { uri: String::new() },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyConnectionUri)
        ));
    }
}
