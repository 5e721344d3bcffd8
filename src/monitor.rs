//! Startup diagnostic and the polling loop.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::Result;
use crate::parser;
use crate::publisher::TelemetryPublisher;
use crate::reading::SensorReading;
use crate::sensors::SensorsCli;

/// One sample: the parsed reading plus the raw report it came from.
#[derive(Debug, Clone)]
pub struct Sample {
    /// The extracted measurement set.
    pub reading: SensorReading,
    /// Raw tool output, kept so the diagnostic phase can show it verbatim.
    pub raw_report: String,
}

/// Outcome of reviewing the startup diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupDecision {
    Proceed,
    Abort,
}

/// Decide whether to enter the monitoring loop after the diagnostic read.
///
/// A reading with at least one non-zero temperature proceeds unconditionally.
/// An all-zero one defers to the callback: the interactive prompt in
/// production, a fixed answer in tests.
pub fn review_diagnostic<F>(reading: &SensorReading, confirm: F) -> StartupDecision
where
    F: FnOnce() -> bool,
{
    if reading.has_temperatures() {
        return StartupDecision::Proceed;
    }

    if confirm() {
        StartupDecision::Proceed
    } else {
        StartupDecision::Abort
    }
}

/// Reads the sensors and delivers readings on a fixed interval, forever.
pub struct SensorMonitor {
    reader: SensorsCli,
    publisher: TelemetryPublisher,
    poll_interval: Duration,
    iteration: u64,
}

impl SensorMonitor {
    /// Build the monitor from a validated configuration.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        Ok(Self {
            reader: SensorsCli::with_program(&config.sensors_program),
            publisher: TelemetryPublisher::new(&config.collector)?,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            iteration: 0,
        })
    }

    /// The sensor tool wrapper, for the startup availability probe.
    pub fn reader(&self) -> &SensorsCli {
        &self.reader
    }

    /// Capture and parse one sample.
    ///
    /// Read and parse failures degrade to an all-zero reading instead of
    /// propagating: the loop must keep publishing whatever it has.
    pub async fn sample(&self) -> Sample {
        let raw_report = match self.reader.capture_report().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Sensor read failed, reporting zeroed values");
                return Sample {
                    reading: SensorReading::default(),
                    raw_report: String::new(),
                };
            }
        };

        let reading = match parser::parse_report(&raw_report) {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %e, "Report parse failed, reporting zeroed values");
                SensorReading::default()
            }
        };

        Sample {
            reading,
            raw_report,
        }
    }

    /// Run the poll loop: read, publish, sleep, repeat.
    ///
    /// Delivery failures are logged and swallowed; the loop never returns.
    pub async fn run(mut self) {
        info!(
            url = %self.publisher.url(),
            interval_secs = self.poll_interval.as_secs(),
            "Starting monitoring loop"
        );

        loop {
            self.iteration += 1;

            if let Err(e) = self.poll_once().await {
                if e.is_connection_failure() {
                    warn!(
                        iteration = self.iteration,
                        error = %e,
                        "Delivery failed, check the collector address and network"
                    );
                } else {
                    warn!(iteration = self.iteration, error = %e, "Delivery failed");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One cycle: sample the sensors and deliver the reading.
    async fn poll_once(&self) -> Result<()> {
        let sample = self.sample().await;
        self.publisher.publish(&sample.reading).await?;
        debug!(iteration = self.iteration, reading = %sample.reading, "Delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollectorConfig, LoggingConfig};

    fn config_with_program(program: &str) -> AgentConfig {
        AgentConfig {
            collector: CollectorConfig {
                host: "127.0.0.1".to_string(),
                port: 8085,
                api_key: "secret".to_string(),
                request_timeout_secs: 2,
            },
            poll_interval_secs: 1,
            sensors_program: program.to_string(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_warm_reading_proceeds_without_prompting() {
        let reading = SensorReading {
            cpu_temp: 45.0,
            gpu_temp: 0.0,
            fan_speed: 0,
        };

        let decision = review_diagnostic(&reading, || panic!("prompt must not run"));
        assert_eq!(decision, StartupDecision::Proceed);
    }

    #[test]
    fn test_gpu_only_reading_counts_as_warm() {
        let reading = SensorReading {
            cpu_temp: 0.0,
            gpu_temp: 60.0,
            fan_speed: 0,
        };

        let decision = review_diagnostic(&reading, || panic!("prompt must not run"));
        assert_eq!(decision, StartupDecision::Proceed);
    }

    #[test]
    fn test_all_zero_reading_proceeds_on_confirmation() {
        let reading = SensorReading::default();
        assert_eq!(
            review_diagnostic(&reading, || true),
            StartupDecision::Proceed
        );
    }

    #[test]
    fn test_all_zero_reading_aborts_on_decline() {
        let reading = SensorReading::default();
        assert_eq!(review_diagnostic(&reading, || false), StartupDecision::Abort);
    }

    #[test]
    fn test_fan_alone_still_prompts() {
        let reading = SensorReading {
            cpu_temp: 0.0,
            gpu_temp: 0.0,
            fan_speed: 900,
        };

        assert_eq!(review_diagnostic(&reading, || false), StartupDecision::Abort);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sample_degrades_to_zero_on_read_failure() {
        let monitor = SensorMonitor::new(&config_with_program("false")).unwrap();
        let sample = monitor.sample().await;

        assert_eq!(sample.reading, SensorReading::default());
        assert!(sample.raw_report.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sample_keeps_raw_report_when_parse_yields_nothing() {
        let monitor = SensorMonitor::new(&config_with_program("echo")).unwrap();
        let sample = monitor.sample().await;

        assert_eq!(sample.reading, SensorReading::default());
        assert_eq!(sample.raw_report, "\n");
    }
}
