//! Platform-agnostic types for ELK-BLEDOM LED controllers.
//!
//! This crate holds the pure, hardware-independent half of the protocol:
//! how a color becomes bytes on the wire, and how a perceived brightness
//! becomes device channel values. It has no Bluetooth dependency and can
//! be used from tests, tools, or other transports.
//!
//! # Features
//!
//! - [`Color`] and [`Brightness`] value types
//! - [`encode`]: color to the fixed 9-byte [`Frame`]
//! - [`compensate`]: perceptual brightness to the controller's `1..=228` range
//! - [`hsl_to_rgb`]: colorspace conversion for hue sweeps
//! - UUID constants for the control service and characteristic
//!
//! # Example
//!
//! ```
//! use bledom_types::{Brightness, Color, compensate, encode};
//!
//! let device_color = compensate(Color::new(255, 64, 0), Brightness::from_percent(40));
//! let frame = encode(device_color);
//! assert_eq!(frame.as_bytes().len(), 9);
//! ```

pub mod brightness;
pub mod color;
pub mod error;
pub mod frame;
pub mod hsl;
pub mod uuid;

pub use brightness::{MAX_DEVICE_BRIGHTNESS, MIN_DEVICE_BRIGHTNESS, compensate};
pub use color::{Brightness, Color};
pub use error::{ParseError, ParseResult};
pub use frame::{FRAME_FOOTER, FRAME_HEADER, FRAME_LEN, Frame, encode};
pub use hsl::{hsl_to_rgb, hue_degrees};
pub use uuid as uuids;

#[cfg(test)]
mod tests {
    use super::*;

    // --- End-to-end: intent to bytes ---

    #[test]
    fn test_compensated_frame_for_half_red() {
        let frame = encode(compensate(Color::RED, Brightness::from_percent(50)));
        assert_eq!(
            frame.as_bytes(),
            &[0x7E, 0x07, 0x05, 0x03, 115, 0, 0, 0x10, 0xEF]
        );
    }

    #[test]
    fn test_rainbow_start_frame() {
        let frame = encode(compensate(hue_degrees(0.0), Brightness::FULL));
        assert_eq!(frame.color(), Color::new(228, 0, 0));
    }

    #[test]
    fn test_off_frame_is_all_zero_payload() {
        let frame = encode(compensate(Color::WHITE, Brightness::OFF));
        assert_eq!(&frame.as_bytes()[4..7], &[0, 0, 0]);
    }

    // --- ParseError tests ---

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidValue("test message".to_string());
        assert_eq!(err.to_string(), "Invalid value: test message");
    }

    #[test]
    fn test_parse_error_debug() {
        let err = ParseError::InsufficientBytes {
            expected: 9,
            actual: 3,
        };
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("InsufficientBytes"));
    }
}
