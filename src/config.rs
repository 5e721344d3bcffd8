//! Agent configuration.
//!
//! Assembled from CLI flags; there is no configuration file.

use crate::error::{AgentError, Result};

/// Path every reading is POSTed to on the collector.
pub const UPDATE_PATH: &str = "/update";

/// Default collector TCP port.
pub const DEFAULT_PORT: u16 = 8085;

/// Default seconds between polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 2;

/// Complete agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Remote collector endpoint settings.
    pub collector: CollectorConfig,

    /// Seconds to sleep between polls.
    pub poll_interval_secs: u64,

    /// Program name or path of the sensor reporting tool.
    pub sensors_program: String,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl AgentConfig {
    /// Validate the configuration, returning an error describing the first
    /// problem found.
    pub fn validate(&self) -> Result<()> {
        if self.collector.host.is_empty() {
            return Err(AgentError::config("collector host must not be empty"));
        }

        if self.collector.port == 0 {
            return Err(AgentError::config("collector port must be greater than 0"));
        }

        if self.collector.api_key.is_empty() {
            return Err(AgentError::config("API key must not be empty"));
        }

        if self.collector.request_timeout_secs == 0 {
            return Err(AgentError::config(
                "request timeout must be greater than 0 seconds",
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(AgentError::config(
                "poll interval must be greater than 0 seconds",
            ));
        }

        if self.sensors_program.is_empty() {
            return Err(AgentError::config("sensors program must not be empty"));
        }

        Ok(())
    }
}

/// Where and how readings are delivered.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Collector host name or IP address.
    pub host: String,

    /// Collector TCP port.
    pub port: u16,

    /// Shared secret sent as the X-API-Key header.
    pub api_key: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl CollectorConfig {
    /// Full URL readings are POSTed to.
    pub fn endpoint_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, UPDATE_PATH)
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,

    /// Log output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Structured JSON for log aggregation.
    Json,
}
