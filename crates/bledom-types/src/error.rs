//! Error types for data parsing in bledom-types.

use thiserror::Error;

/// Errors that can occur when decoding controller data.
///
/// This error type is platform-agnostic and does not include
/// BLE-specific errors (those belong in bledom-core).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Not enough (or too many) bytes for the expected layout.
    #[error("Invalid frame length: requires {expected} bytes, got {actual}")]
    InsufficientBytes {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes received.
        actual: usize,
    },

    /// A byte that should be fixed by the protocol had a different value.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using bledom-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
