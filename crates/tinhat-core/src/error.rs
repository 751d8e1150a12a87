//! Error types for tinhat-core.
//!
//! Every operation in this crate talks to a system utility through a
//! [`crate::CommandRunner`]. Failures come from the utility itself or from
//! input rejected before it runs:
//!
//! | Error | Meaning | Typical handling |
//! |-------|---------|------------------|
//! | [`Error::CommandUnavailable`] | The program could not be started | Degrade to an empty result |
//! | [`Error::CommandFailed`] | The program exited non-zero | Degrade, log stderr |
//! | [`Error::Timeout`] | The program ran past its budget | Degrade, the child is killed |
//! | [`Error::InvalidAddress`] | Input rejected before any call | Report to the caller |
//! | [`Error::InvalidConfig`] | Bad toolkit options | Fix configuration |
//!
//! The high-level [`crate::Toolkit`] methods never return these errors; they
//! log them and fall back to the documented default. The `try_*` variants and
//! the runner itself surface them.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when running system utilities.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The program could not be spawned (missing binary, permissions).
    #[error("Command '{program}' unavailable: {source}")]
    CommandUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("Command '{program}' failed ({}): {stderr}", exit_label(.code))]
    CommandFailed {
        program: String,
        /// Exit code, `None` if terminated by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Address rejected by the validator.
    #[error(transparent)]
    InvalidAddress(#[from] tinhat_types::ParseError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Create a spawn failure error.
    pub fn unavailable(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandUnavailable {
            program: program.into(),
            source,
        }
    }

    /// Create a non-zero exit error.
    pub fn command_failed(
        program: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            program: program.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if the underlying utility could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::CommandUnavailable { .. })
    }
}

/// Result type alias using tinhat-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
