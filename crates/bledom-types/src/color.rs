//! Color and brightness value types.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An RGB color with one byte per channel.
///
/// Colors are plain values: once built they are never mutated, and every
/// animation step produces a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
}

impl Color {
    /// All channels off.
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// All channels at full value.
    pub const WHITE: Color = Color::new(255, 255, 255);
    /// Full red.
    pub const RED: Color = Color::new(255, 0, 0);
    /// Full green.
    pub const GREEN: Color = Color::new(0, 255, 0);
    /// Full blue.
    pub const BLUE: Color = Color::new(0, 0, 255);

    /// Create a color from three channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from arbitrary integers, clamping each channel to 0-255.
    ///
    /// # Examples
    ///
    /// ```
    /// use bledom_types::Color;
    ///
    /// assert_eq!(Color::clamped(300, -5, 128), Color::new(255, 0, 128));
    /// ```
    #[must_use]
    pub fn clamped(r: i64, g: i64, b: i64) -> Self {
        fn channel(v: i64) -> u8 {
            // Lossless after the clamp.
            v.clamp(0, 255) as u8
        }
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Returns the channels as an `[r, g, b]` array.
    #[must_use]
    pub const fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Whether every channel is zero.
    #[must_use]
    pub const fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for (u8, u8, u8) {
    fn from(color: Color) -> Self {
        (color.r, color.g, color.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Perceived brightness as a percentage in `[0, 100]`.
///
/// User input is integral, but animation ramps produce fractional
/// intermediate levels, so the value is stored as `f64`. Out-of-range and
/// non-finite inputs are clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "f64", from = "f64"))]
pub struct Brightness(f64);

impl Brightness {
    /// Fully off.
    pub const OFF: Brightness = Brightness(0.0);
    /// Full brightness.
    pub const FULL: Brightness = Brightness(100.0);

    /// Create a brightness level, clamping to `[0, 100]`.
    ///
    /// `NaN` is treated as off.
    ///
    /// # Examples
    ///
    /// ```
    /// use bledom_types::Brightness;
    ///
    /// assert_eq!(Brightness::new(150.0).percent(), 100.0);
    /// assert_eq!(Brightness::new(-3.0).percent(), 0.0);
    /// assert_eq!(Brightness::new(42.5).percent(), 42.5);
    /// ```
    #[must_use]
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::OFF;
        }
        Self(percent.clamp(0.0, 100.0))
    }

    /// Create a brightness level from an integer, clamping to `[0, 100]`.
    #[must_use]
    pub fn from_percent(percent: i64) -> Self {
        // Lossless after the clamp.
        Self(percent.clamp(0, 100) as f64)
    }

    /// The level as a percentage.
    #[must_use]
    pub const fn percent(&self) -> f64 {
        self.0
    }

    /// The level as a fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }

    /// Whether this level turns the strip off.
    #[must_use]
    pub fn is_off(&self) -> bool {
        self.0 <= 0.0
    }
}

impl From<f64> for Brightness {
    fn from(percent: f64) -> Self {
        Self::new(percent)
    }
}

impl From<Brightness> for f64 {
    fn from(level: Brightness) -> Self {
        level.0
    }
}

impl From<u8> for Brightness {
    fn from(percent: u8) -> Self {
        Self::from_percent(i64::from(percent))
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}%", self.0)
        } else {
            write!(f, "{:.1}%", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_clamped_bounds() {
        assert_eq!(Color::clamped(-1, 0, 256), Color::new(0, 0, 255));
        assert_eq!(Color::clamped(i64::MIN, i64::MAX, 7), Color::new(0, 255, 7));
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::RED.channels(), [255, 0, 0]);
        assert_eq!(Color::GREEN.channels(), [0, 255, 0]);
        assert_eq!(Color::BLUE.channels(), [0, 0, 255]);
        assert!(Color::BLACK.is_black());
        assert!(!Color::WHITE.is_black());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::new(10, 20, 30).to_string(), "RGB(10, 20, 30)");
    }

    #[test]
    fn test_color_tuple_conversion() {
        let color: Color = (1, 2, 3).into();
        let tuple: (u8, u8, u8) = color.into();
        assert_eq!(tuple, (1, 2, 3));
    }

    #[test]
    fn test_brightness_clamps() {
        assert_eq!(Brightness::from_percent(250), Brightness::FULL);
        assert_eq!(Brightness::from_percent(-10), Brightness::OFF);
        assert_eq!(Brightness::new(f64::INFINITY), Brightness::FULL);
        assert_eq!(Brightness::new(f64::NAN), Brightness::OFF);
        assert_eq!(Brightness::from(50u8).percent(), 50.0);
    }

    #[test]
    fn test_brightness_is_off() {
        assert!(Brightness::OFF.is_off());
        assert!(!Brightness::new(0.01).is_off());
    }

    #[test]
    fn test_brightness_display() {
        assert_eq!(Brightness::from_percent(50).to_string(), "50%");
        assert_eq!(Brightness::new(12.34).to_string(), "12.3%");
    }

    #[test]
    fn test_color_serialization() {
        let json = serde_json::to_string(&Color::new(1, 2, 3)).unwrap();
        assert_eq!(json, r#"{"r":1,"g":2,"b":3}"#);
        let brightness: Brightness = serde_json::from_str("75.0").unwrap();
        assert_eq!(brightness.percent(), 75.0);
    }
}
