//! Trait abstractions for running system utilities.
//!
//! This module provides the [`CommandRunner`] trait that abstracts over
//! real process execution ([`crate::SystemRunner`]) and scripted runners
//! for testing ([`crate::MockRunner`]).

use async_trait::async_trait;

use crate::commands::CommandSpec;
use crate::error::{Error, Result};

/// Captured result of a finished program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns `true` if the program exited with status zero.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait abstracting the execution of external programs.
///
/// Implementations must enforce [`CommandSpec::timeout`] and return
/// [`Error::Timeout`] when it elapses.
///
/// # Example
///
/// ```
/// use tinhat_core::{CommandRunner, CommandSpec, Result};
///
/// async fn inventory_text<R: CommandRunner>(runner: &R) -> Result<String> {
///     let output = runner.run_checked(&CommandSpec::bluetooth_inventory()).await?;
///     Ok(output.stdout)
/// }
/// ```
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the program to completion, whatever its exit status.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Run the program and treat a non-zero exit as an error.
    async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(spec).await?;
        if output.is_success() {
            Ok(output)
        } else {
            Err(Error::command_failed(
                spec.program_name(),
                output.code,
                output.stderr.trim(),
            ))
        }
    }
}

#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(spec).await
    }
}

#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(spec).await
    }
}

#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(spec).await
    }
}
