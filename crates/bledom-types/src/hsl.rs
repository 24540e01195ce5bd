//! HSL to RGB conversion, used by the rainbow animation.

use crate::color::Color;

/// Convert a hue/saturation/lightness triple to RGB.
///
/// All inputs are fractions in `[0, 1]` (hue 1.0 is a full turn). Each
/// output channel is `round(channel * 255)`.
///
/// # Examples
///
/// ```
/// use bledom_types::{Color, hsl_to_rgb};
///
/// assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Color::new(255, 0, 0));
/// assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Color::new(0, 255, 0));
/// assert_eq!(hsl_to_rgb(0.0, 0.0, 0.5), Color::new(128, 128, 128));
/// ```
#[must_use]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Color {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    Color::new(to_byte(r), to_byte(g), to_byte(b))
}

/// Rainbow helper: fully saturated, mid-lightness color for a hue in degrees.
#[must_use]
pub fn hue_degrees(degrees: f64) -> Color {
    hsl_to_rgb(degrees / 360.0, 1.0, 0.5)
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t >= 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}
