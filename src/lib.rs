//! HTTP bridge for lm-sensors hardware telemetry.
//!
//! Reads CPU/GPU temperatures and fan speed from the `sensors` report and
//! POSTs them as JSON to a remote collector on a fixed interval.
//!
//! - [`args`] - Command-line arguments
//! - [`config`] - Runtime configuration
//! - [`sensors`] - External tool probe and report capture
//! - [`parser`] - Heuristic report parsing
//! - [`reading`] - The extracted measurement set
//! - [`publisher`] - HTTP delivery to the collector
//! - [`monitor`] - Startup diagnostic and the polling loop
//! - [`error`] - Error types

pub mod args;
pub mod config;
pub mod error;
pub mod monitor;
pub mod parser;
pub mod publisher;
pub mod reading;
pub mod sensors;

pub use args::AgentArgs;
pub use config::{AgentConfig, CollectorConfig, LogFormat, LoggingConfig};
pub use error::{AgentError, Result};
pub use monitor::{Sample, SensorMonitor, StartupDecision, review_diagnostic};
pub use parser::parse_report;
pub use publisher::TelemetryPublisher;
pub use reading::SensorReading;
pub use sensors::SensorsCli;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// # Example
///
/// ```ignore
/// use http_bridge_lmsensors::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| {
                    AgentError::config(format!("Failed to initialize tracing: {}", e))
                })?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| {
                    AgentError::config(format!("Failed to initialize tracing: {}", e))
                })?;
        }
    }

    Ok(())
}
