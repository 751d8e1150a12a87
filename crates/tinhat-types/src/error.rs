//! Error types for tinhat-types.

use thiserror::Error;

/// Errors that can occur when building typed values from raw command text.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The text is not six two-digit hex groups joined by `:` or `-`.
    #[error("Invalid Bluetooth address: {0:?}")]
    InvalidAddress(String),

    /// A value could not be interpreted.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using tinhat-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
