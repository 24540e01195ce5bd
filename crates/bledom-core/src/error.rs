//! Error types for bledom-core.
//!
//! # Error Recovery Strategies
//!
//! | Error Type | Strategy | Rationale |
//! |------------|----------|-----------|
//! | [`Error::WriteFailed`] | Skip the step | One lost frame is invisible in an animation |
//! | [`Error::Timeout`] | Skip the step / abort setup | Transient BLE congestion |
//! | [`Error::Bluetooth`] | Abort setup, clean up | Adapter or stack failure |
//! | [`Error::DeviceNotFound`] | Abort, clean up | Controller powered off or out of range |
//! | [`Error::CharacteristicNotFound`] | Abort, clean up | Not an ELK-BLEDOM controller |
//! | [`Error::NotConnected`] | Abort, clean up | Connection was lost |
//!
//! Errors during a single animation step never abort the remaining
//! sequence; the engine in [`crate::engine`] logs them and moves on.
//! Errors during setup abort before any frame is sent.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to an ELK-BLEDOM controller.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Bluetooth Low Energy error.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Controller not found during discovery.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// Operation attempted while not connected to the controller.
    #[error("Not connected to device")]
    NotConnected,

    /// Control characteristic not found on the device.
    #[error("Characteristic not found: {uuid} (searched in {service_count} services)")]
    CharacteristicNotFound {
        /// The UUID that was not found.
        uuid: String,
        /// Number of services that were searched.
        service_count: usize,
    },

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Write operation failed.
    #[error("Write failed to characteristic {uuid}: {reason}")]
    WriteFailed {
        /// The characteristic UUID.
        uuid: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Invalid data received or produced.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Reason why a controller was not found.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// Nothing matching was advertising before the scan window closed.
    ScanTimeout {
        /// The name prefix or address that was searched for.
        identifier: String,
        /// How long the scan ran.
        duration: Duration,
    },
    /// The adapter's event stream ended before a match was seen.
    ScanEnded,
    /// No Bluetooth adapter available.
    NoAdapter,
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanTimeout {
                identifier,
                duration,
            } => write!(
                f,
                "no device matching '{}' within {:?}",
                identifier, duration
            ),
            Self::ScanEnded => write!(f, "scan ended unexpectedly"),
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
        }
    }
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a characteristic not found error.
    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    /// Create a write failure.
    pub fn write_failed(uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            uuid: uuid.into(),
            reason: reason.into(),
        }
    }
}

impl From<bledom_types::ParseError> for Error {
    fn from(err: bledom_types::ParseError) -> Self {
        Error::InvalidData(err.to_string())
    }
}

/// Result type alias using bledom-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotConnected;
        assert_eq!(err.to_string(), "Not connected to device");

        let err = Error::characteristic_not_found("0000fff3", 3);
        assert!(err.to_string().contains("0000fff3"));
        assert!(err.to_string().contains("3 services"));

        let err = Error::timeout("connect", Duration::from_secs(10));
        assert!(err.to_string().contains("connect"));
        assert!(err.to_string().contains("10s"));

        let err = Error::write_failed("0000fff3", "GATT busy");
        assert_eq!(
            err.to_string(),
            "Write failed to characteristic 0000fff3: GATT busy"
        );
    }

    #[test]
    fn test_device_not_found_reasons() {
        let err = Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter);
        assert!(err.to_string().contains("no Bluetooth adapter"));

        let err = Error::DeviceNotFound(DeviceNotFoundReason::ScanTimeout {
            identifier: "ELK".to_string(),
            duration: Duration::from_secs(15),
        });
        assert!(err.to_string().contains("'ELK'"));
        assert!(err.to_string().contains("15s"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse = bledom_types::ParseError::InsufficientBytes {
            expected: 9,
            actual: 2,
        };
        let err: Error = parse.into();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("requires 9 bytes"));
    }

    #[test]
    fn test_btleplug_error_conversion() {
        fn _assert_from_impl<T: From<btleplug::Error>>() {}
        _assert_from_impl::<Error>();
    }
}
