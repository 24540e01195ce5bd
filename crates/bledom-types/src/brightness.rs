//! Perceptual-to-device brightness mapping.
//!
//! ELK-BLEDOM controllers only produce visibly distinct output for channel
//! values in roughly `1..=228`; anything above saturates. The compensator
//! maps a logical 0-255 channel at a 0-100% brightness into that window,
//! keeping logically-off channels at exactly zero and logically-on channels
//! at least at 1 so they never disappear at low brightness.

use crate::color::{Brightness, Color};

/// Lowest device value that still lights a channel.
pub const MIN_DEVICE_BRIGHTNESS: u8 = 1;

/// Highest device value with a visible effect.
pub const MAX_DEVICE_BRIGHTNESS: u8 = 228;

/// Scale a logical color to device values at the given brightness.
///
/// - Brightness at or below zero turns everything off, whatever the color.
/// - A zero channel stays zero.
/// - A nonzero channel becomes
///   `max(1, round(v / 255 * (1 + brightness / 100 * 227)))`.
///
/// Rounding is half away from zero (`f64::round`).
///
/// # Examples
///
/// ```
/// use bledom_types::{Brightness, Color, compensate};
///
/// assert_eq!(compensate(Color::RED, Brightness::FULL), Color::new(228, 0, 0));
/// assert_eq!(compensate(Color::RED, Brightness::from_percent(50)), Color::new(115, 0, 0));
/// assert_eq!(compensate(Color::WHITE, Brightness::OFF), Color::BLACK);
/// ```
#[must_use]
pub fn compensate(color: Color, brightness: Brightness) -> Color {
    if brightness.is_off() {
        return Color::BLACK;
    }

    let range = f64::from(MAX_DEVICE_BRIGHTNESS - MIN_DEVICE_BRIGHTNESS);
    let ceiling = f64::from(MIN_DEVICE_BRIGHTNESS) + brightness.fraction() * range;

    let channel = |value: u8| -> u8 {
        if value == 0 {
            return 0;
        }
        let scaled = (f64::from(value) / 255.0 * ceiling)
            .round()
            .clamp(f64::from(MIN_DEVICE_BRIGHTNESS), f64::from(MAX_DEVICE_BRIGHTNESS));
        scaled as u8
    };

    Color::new(channel(color.r), channel(color.g), channel(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_red_hits_device_maximum() {
        assert_eq!(
            compensate(Color::RED, Brightness::FULL),
            Color::new(228, 0, 0)
        );
    }

    #[test]
    fn test_half_red_rounds_up() {
        // 1 + 0.5 * 227 = 114.5
        assert_eq!(
            compensate(Color::RED, Brightness::from_percent(50)),
            Color::new(115, 0, 0)
        );
    }

    #[test]
    fn test_partial_green_channel() {
        // 128 / 255 * 114.5 = 57.47
        assert_eq!(
            compensate(Color::new(0, 128, 0), Brightness::from_percent(50)),
            Color::new(0, 57, 0)
        );
    }

    #[test]
    fn test_dim_channel_floors_at_one() {
        // 1 / 255 * (1 + 0.01 * 227) rounds to 0 before the floor.
        assert_eq!(
            compensate(Color::new(1, 0, 0), Brightness::from_percent(1)),
            Color::new(1, 0, 0)
        );
    }

    #[test]
    fn test_off_ignores_color() {
        assert_eq!(compensate(Color::WHITE, Brightness::OFF), Color::BLACK);
        assert_eq!(
            compensate(Color::WHITE, Brightness::new(-20.0)),
            Color::BLACK
        );
    }

    #[test]
    fn test_fractional_brightness() {
        // Pulse ramps feed non-integer levels: 1 + 0.025 * 227 = 6.675
        assert_eq!(
            compensate(Color::WHITE, Brightness::new(2.5)),
            Color::new(7, 7, 7)
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_deserialized_brightness_stays_in_device_range() {
        let level: Brightness = serde_json::from_str("150.0").unwrap();
        assert_eq!(level.percent(), 100.0);
        assert_eq!(compensate(Color::RED, level), Color::new(228, 0, 0));

        let level: Brightness = serde_json::from_str("-40.0").unwrap();
        assert_eq!(compensate(Color::WHITE, level), Color::BLACK);
    }

    proptest! {
        #[test]
        fn zero_brightness_is_black(r: u8, g: u8, b: u8, level in -100.0f64..=0.0) {
            prop_assert_eq!(compensate(Color::new(r, g, b), Brightness::new(level)), Color::BLACK);
        }

        #[test]
        fn zero_channels_stay_zero(v: u8, level in 0.0f64..=100.0) {
            let out = compensate(Color::new(0, v, 0), Brightness::new(level));
            prop_assert_eq!(out.r, 0);
            prop_assert_eq!(out.b, 0);
        }

        #[test]
        fn lit_channels_stay_lit(v in 1u8..=255, level in 0.001f64..=100.0) {
            let out = compensate(Color::new(v, v, v), Brightness::new(level));
            prop_assert!(out.r >= MIN_DEVICE_BRIGHTNESS);
            prop_assert!(out.r <= MAX_DEVICE_BRIGHTNESS);
        }

        #[test]
        fn monotonic_in_brightness(v in 1u8..=255, a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let dim = compensate(Color::new(v, 0, 0), Brightness::new(lo));
            let bright = compensate(Color::new(v, 0, 0), Brightness::new(hi));
            prop_assert!(dim.r <= bright.r);
        }
    }
}
