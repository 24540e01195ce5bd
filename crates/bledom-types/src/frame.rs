//! The 9-byte "set color" command frame.
//!
//! Every command understood by an ELK-BLEDOM controller on the FFF3
//! characteristic uses the same layout:
//!
//! ```text
//! [0x7E, 0x07, 0x05, 0x03, R, G, B, 0x10, 0xEF]
//! ```
//!
//! The header and footer never change; only the three color bytes do.

use core::fmt;

use crate::color::Color;
use crate::error::ParseError;

/// Number of bytes in a frame.
pub const FRAME_LEN: usize = 9;

/// Fixed leading bytes of every frame.
pub const FRAME_HEADER: [u8; 4] = [0x7E, 0x07, 0x05, 0x03];

/// Fixed trailing bytes of every frame.
pub const FRAME_FOOTER: [u8; 2] = [0x10, 0xEF];

/// An encoded command ready to be written to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// The raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// The color carried by this frame.
    #[must_use]
    pub const fn color(&self) -> Color {
        Color::new(self.0[4], self.0[5], self.0[6])
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Color> for Frame {
    fn from(color: Color) -> Self {
        encode(color)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = ParseError;

    /// Decode a frame previously produced by [`encode`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bledom_types::{Color, Frame, encode};
    ///
    /// let frame = encode(Color::new(1, 2, 3));
    /// let decoded = Frame::try_from(frame.as_ref()).unwrap();
    /// assert_eq!(decoded.color(), Color::new(1, 2, 3));
    ///
    /// assert!(Frame::try_from(&[0x7E, 0x07][..]).is_err());
    /// ```
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; FRAME_LEN] =
            bytes
                .try_into()
                .map_err(|_| ParseError::InsufficientBytes {
                    expected: FRAME_LEN,
                    actual: bytes.len(),
                })?;

        if raw[..4] != FRAME_HEADER {
            return Err(ParseError::InvalidValue(format!(
                "bad frame header {:02X?}",
                &raw[..4]
            )));
        }
        if raw[7..] != FRAME_FOOTER {
            return Err(ParseError::InvalidValue(format!(
                "bad frame footer {:02X?}",
                &raw[7..]
            )));
        }

        Ok(Self(raw))
    }
}

impl fmt::Display for Frame {
    /// Formats as `[0x7e, 0x07, ...]`, matching what shows up in BLE sniffer logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:#04x}", byte)?;
        }
        f.write_str("]")
    }
}

/// Encode a color into the controller's wire frame.
///
/// This is a total function: channels are already bytes, so there is
/// nothing to validate.
///
/// # Examples
///
/// ```
/// use bledom_types::{Color, encode};
///
/// let frame = encode(Color::new(10, 20, 30));
/// assert_eq!(
///     frame.as_bytes(),
///     &[0x7E, 0x07, 0x05, 0x03, 10, 20, 30, 0x10, 0xEF]
/// );
/// ```
#[must_use]
pub const fn encode(color: Color) -> Frame {
    Frame([
        FRAME_HEADER[0],
        FRAME_HEADER[1],
        FRAME_HEADER[2],
        FRAME_HEADER[3],
        color.r,
        color.g,
        color.b,
        FRAME_FOOTER[0],
        FRAME_FOOTER[1],
    ])
}
