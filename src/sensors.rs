//! Invocation of the external `sensors` reporting tool.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::{AgentError, Result};

/// Default program name for the lm-sensors reporting tool.
pub const DEFAULT_PROGRAM: &str = "sensors";

/// Wrapper around the external `sensors` executable.
///
/// The program name is carried as a field so unusual installs and tests can
/// point it somewhere else.
#[derive(Debug, Clone)]
pub struct SensorsCli {
    program: String,
}

impl SensorsCli {
    /// Wrap the default `sensors` program from PATH.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Wrap a specific executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program name used for spawning.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Probe whether the tool is installed and executable by running its
    /// version flag. Any spawn failure or non-zero exit counts as absent.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Probe the tool, mapping absence to [`AgentError::ToolUnavailable`].
    pub async fn ensure_available(&self) -> Result<()> {
        if self.is_available().await {
            Ok(())
        } else {
            Err(AgentError::tool_unavailable(&self.program))
        }
    }

    /// Capture one full report from the tool's standard output.
    pub async fn capture_report(&self) -> Result<String> {
        let output = Command::new(&self.program).output().await.map_err(|e| {
            AgentError::execution(format!("failed to run '{}': {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::execution(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for SensorsCli {
    fn default() -> Self {
        Self::new()
    }
}
