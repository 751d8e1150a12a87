//! Process execution on the host.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::commands::CommandSpec;
use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};

/// Runs programs with `tokio::process`, enforcing each command's timeout.
///
/// The child is killed if the timeout elapses or the future is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!(command = %spec, timeout = ?spec.timeout, "Running command");

        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(spec.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!("Failed to start {}: {}", spec.program, e);
                return Err(Error::unavailable(spec.program_name(), e));
            }
            Err(_) => {
                warn!("{} timed out after {:?}", spec, spec.timeout);
                return Err(Error::timeout(spec.to_string(), spec.timeout));
            }
        };

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.is_success() {
            debug!(
                "{} exited with {:?}: {}",
                spec.program_name(),
                result.code,
                result.stderr.trim()
            );
        }

        Ok(result)
    }
}
