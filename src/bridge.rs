//! Bridge executable invocation
//!
//! Runs the external device-control tool with a literal argument list,
//! never a shell-interpolated string, under a bounded timeout. Captured
//! output is decoded tolerantly; bytes that are not valid UTF-8 become the
//! replacement character instead of failing the invocation.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one bridge invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best human-readable diagnostic for a failed invocation
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Handle to the resolved bridge executable
#[derive(Debug, Clone)]
pub struct Bridge {
    program: PathBuf,
    serial: Option<String>,
    timeout: Duration,
}

impl Bridge {
    /// Resolve the configured bridge executable
    pub fn new(config: &Config) -> Result<Self> {
        let program = which::which(&config.bridge).map_err(|e| {
            Error::ExternalTool(format!("bridge executable '{}': {}", config.bridge, e))
        })?;
        Ok(Self {
            program,
            serial: config.serial.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Run the bridge with the given arguments, attempt-once
    ///
    /// A non-zero exit is not an error at this layer; callers decide whether
    /// absent output is meaningful. Launch failures and timeouts are.
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.program);
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);

        debug!(program = %self.program.display(), ?args, "invoking bridge");
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                Error::ExternalTool(format!(
                    "'{}' timed out after {}s",
                    self.program.display(),
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                Error::ExternalTool(format!("failed to run '{}': {}", self.program.display(), e))
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }
}
