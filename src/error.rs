//! Error types for the agent.

use thiserror::Error;

/// Result type alias using [`AgentError`].
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors raised while probing, reading, parsing, or delivering.
///
/// Only [`AgentError::ToolUnavailable`] and [`AgentError::Config`] are fatal,
/// and only during startup; everything else is logged by the poll loop and
/// swallowed so the process keeps running.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The external sensor tool is missing or not executable.
    #[error("'{program}' command not found or not executable")]
    ToolUnavailable { program: String },

    /// The sensor tool was found but one invocation of it failed.
    #[error("Sensor read failed: {0}")]
    ReportExecution(String),

    /// A matched report line defeated the field extractors.
    #[error("Report parse error: {0}")]
    ParseAnomaly(String),

    /// Transport-level delivery failure (connect, DNS, timeout).
    #[error("Delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),

    /// The collector answered with something other than HTTP 200.
    #[error("Collector responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Configuration validation error.
    #[error("Configuration validation failed: {0}")]
    Config(String),
}

impl AgentError {
    /// Create a tool-unavailable error.
    pub fn tool_unavailable(program: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            program: program.into(),
        }
    }

    /// Create a report-execution error.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::ReportExecution(msg.into())
    }

    /// Create a parse-anomaly error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseAnomaly(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the failure was a refused/unreachable connection, which
    /// usually means the collector address or network is wrong.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Delivery(e) if e.is_connect())
    }
}
