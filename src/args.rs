//! Command-line arguments for the agent.

use clap::Parser;

use crate::config::{
    AgentConfig, CollectorConfig, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, LogFormat, LoggingConfig,
};
use crate::sensors::DEFAULT_PROGRAM;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Pushes lm-sensors hardware telemetry to an HTTP collector")]
pub struct AgentArgs {
    /// Collector host name or IP address
    #[arg(long)]
    pub host: String,

    /// Collector TCP port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Shared secret sent as the X-API-Key header
    #[arg(long)]
    pub api_key: String,

    /// Seconds to sleep between polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub interval: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Program name or path of the sensor reporting tool
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    pub sensors_bin: String,

    /// Proceed without prompting when the diagnostic read is all zeros
    #[arg(long)]
    pub assume_yes: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl AgentArgs {
    /// Assemble the runtime configuration from the parsed arguments.
    pub fn into_config(self) -> AgentConfig {
        AgentConfig {
            collector: CollectorConfig {
                host: self.host,
                port: self.port,
                api_key: self.api_key,
                request_timeout_secs: self.timeout,
            },
            poll_interval_secs: self.interval,
            sensors_program: self.sensors_bin,
            logging: LoggingConfig {
                level: self.log_level,
                format: self.log_format,
            },
        }
    }
}
