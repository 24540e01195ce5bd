//! Animation descriptions and their frame sequences.
//!
//! An [`AnimationSpec`] fully determines what the strip will show: every
//! variant expands through [`AnimationSpec::steps`] into a finite list of
//! [`AnimationStep`]s, each carrying a device-scaled color and how long to
//! hold it. Nothing here talks to a device; see [`crate::engine`] for
//! playback.
//!
//! # Example
//!
//! ```
//! use bledom_core::AnimationSpec;
//! use bledom_types::{Brightness, Color};
//!
//! let pulse = AnimationSpec::pulse(Color::RED, Brightness::FULL);
//! let steps = pulse.steps();
//! assert_eq!(steps.len(), 41);
//! assert_eq!(steps[20].color, Color::new(228, 0, 0));
//! ```

use std::fmt;
use std::time::Duration;

use bledom_types::{Brightness, Color, compensate, hue_degrees};

/// Default pulse length (rise and fall together).
pub const PULSE_DURATION: Duration = Duration::from_millis(2000);
/// Default number of rising steps in a pulse.
pub const PULSE_STEPS: u32 = 20;
/// Default fade length.
pub const SMOOTH_DURATION: Duration = Duration::from_millis(2000);
/// Default number of fade steps.
pub const SMOOTH_STEPS: u32 = 20;
/// Default number of flashes.
pub const FLASH_COUNT: u32 = 5;
/// Default time each flash stays on (and off).
pub const FLASH_HOLD: Duration = Duration::from_millis(200);
/// Default length of one rainbow turn.
pub const RAINBOW_DURATION: Duration = Duration::from_millis(5000);
/// Default number of hues in a rainbow turn.
pub const RAINBOW_STEPS: u32 = 30;
/// Default running-light pacing duration.
pub const RUNNING_DURATION: Duration = Duration::from_millis(2000);
/// Default running-light pacing steps.
pub const RUNNING_STEPS: u32 = 20;

/// How many times the running light cycles through its palette.
pub const RUNNING_CYCLES: usize = 3;

/// One frame of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    /// Device-scaled color to write.
    pub color: Color,
    /// Brightness the color was scaled with.
    pub brightness: Brightness,
    /// How long to wait after the frame is written.
    pub hold: Duration,
}

impl AnimationStep {
    fn new(color: Color, brightness: Brightness, hold: Duration) -> Self {
        Self {
            color,
            brightness,
            hold,
        }
    }
}

/// What to show on the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum AnimationSpec {
    /// A single color. With `brightness: None` the channels are written as
    /// given, without compensation.
    SetColor {
        color: Color,
        brightness: Option<Brightness>,
    },
    /// Fade in from off to `brightness`, then back out to off.
    Pulse {
        color: Color,
        brightness: Brightness,
        duration: Duration,
        steps: u32,
    },
    /// Linear fade between two brightness levels.
    Smooth {
        color: Color,
        from: Brightness,
        to: Brightness,
        duration: Duration,
        steps: u32,
    },
    /// Alternate between the color and black.
    Flash {
        color: Color,
        brightness: Brightness,
        count: u32,
        on_off_duration: Duration,
    },
    /// One turn around the hue wheel.
    Rainbow {
        brightness: Brightness,
        duration: Duration,
        steps: u32,
    },
    /// Cycle through channel combinations of the color, then settle on it.
    Running {
        color: Color,
        brightness: Brightness,
        duration: Duration,
        steps: u32,
    },
}

impl AnimationSpec {
    /// A compensated static color.
    pub fn set_color(color: Color, brightness: Brightness) -> Self {
        Self::SetColor {
            color,
            brightness: Some(brightness),
        }
    }

    /// A static color written exactly as given.
    pub fn raw(color: Color) -> Self {
        Self::SetColor {
            color,
            brightness: None,
        }
    }

    /// Pulse with the default timing.
    pub fn pulse(color: Color, brightness: Brightness) -> Self {
        Self::Pulse {
            color,
            brightness,
            duration: PULSE_DURATION,
            steps: PULSE_STEPS,
        }
    }

    /// Fade with the default timing.
    pub fn smooth(color: Color, from: Brightness, to: Brightness) -> Self {
        Self::Smooth {
            color,
            from,
            to,
            duration: SMOOTH_DURATION,
            steps: SMOOTH_STEPS,
        }
    }

    /// Flash with the default count and timing.
    pub fn flash(color: Color, brightness: Brightness) -> Self {
        Self::Flash {
            color,
            brightness,
            count: FLASH_COUNT,
            on_off_duration: FLASH_HOLD,
        }
    }

    /// Rainbow with the default timing.
    pub fn rainbow(brightness: Brightness) -> Self {
        Self::Rainbow {
            brightness,
            duration: RAINBOW_DURATION,
            steps: RAINBOW_STEPS,
        }
    }

    /// Running light with the default timing.
    pub fn running(color: Color, brightness: Brightness) -> Self {
        Self::Running {
            color,
            brightness,
            duration: RUNNING_DURATION,
            steps: RUNNING_STEPS,
        }
    }

    /// Short lowercase name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetColor { .. } => "color",
            Self::Pulse { .. } => "pulse",
            Self::Smooth { .. } => "smooth",
            Self::Flash { .. } => "flash",
            Self::Rainbow { .. } => "rainbow",
            Self::Running { .. } => "running",
        }
    }

    /// Expand into the full frame sequence.
    pub fn steps(&self) -> Vec<AnimationStep> {
        match *self {
            Self::SetColor { color, brightness } => {
                let step = match brightness {
                    Some(level) => {
                        AnimationStep::new(compensate(color, level), level, Duration::ZERO)
                    }
                    None => AnimationStep::new(color, Brightness::FULL, Duration::ZERO),
                };
                vec![step]
            }
            Self::Pulse {
                color,
                brightness,
                duration,
                steps,
            } => {
                let steps = normalize(steps);
                let hold = pulse_hold(duration, steps);
                let level_at = |i: u32| ramp(0.0, brightness.percent(), i, steps);

                (0..steps)
                    .chain((0..=steps).rev())
                    .map(|i| {
                        let level = level_at(i);
                        AnimationStep::new(compensate(color, level), level, hold)
                    })
                    .collect()
            }
            Self::Smooth {
                color,
                from,
                to,
                duration,
                steps,
            } => {
                let steps = normalize(steps);
                let hold = duration / steps;

                (0..=steps)
                    .map(|i| {
                        let level = ramp(from.percent(), to.percent(), i, steps);
                        AnimationStep::new(compensate(color, level), level, hold)
                    })
                    .collect()
            }
            Self::Flash {
                color,
                brightness,
                count,
                on_off_duration,
            } => {
                let on =
                    AnimationStep::new(compensate(color, brightness), brightness, on_off_duration);
                let off = AnimationStep::new(Color::BLACK, Brightness::OFF, on_off_duration);

                (0..count).flat_map(|_| [on, off]).collect()
            }
            Self::Rainbow {
                brightness,
                duration,
                steps,
            } => {
                let steps = normalize(steps);
                let hold = duration / steps;

                (0..steps)
                    .map(|i| {
                        let hue = f64::from(i) / f64::from(steps) * 360.0;
                        let color = compensate(hue_degrees(hue), brightness);
                        AnimationStep::new(color, brightness, hold)
                    })
                    .collect()
            }
            Self::Running {
                color,
                brightness,
                duration,
                steps,
            } => {
                let hold = duration / normalize(steps);
                let full = compensate(color, brightness);

                let mut frames: Vec<AnimationStep> = running_palette(full)
                    .iter()
                    .cycle()
                    .take(RUNNING_PALETTE_LEN * RUNNING_CYCLES)
                    .map(|&c| AnimationStep::new(c, brightness, hold))
                    .collect();
                frames.push(AnimationStep::new(full, brightness, Duration::ZERO));
                frames
            }
        }
    }

    /// Number of frames [`steps`](Self::steps) produces.
    pub fn frame_count(&self) -> usize {
        self.steps().len()
    }

    /// Sum of all hold times.
    pub fn total_duration(&self) -> Duration {
        self.steps().iter().map(|s| s.hold).sum()
    }
}

impl fmt::Display for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetColor {
                color,
                brightness: Some(level),
            } => write!(f, "{} at {}", color, level),
            Self::SetColor {
                color,
                brightness: None,
            } => write!(f, "{}", color),
            Self::Pulse {
                color, brightness, ..
            } => write!(f, "pulse {} at {}", color, brightness),
            Self::Smooth {
                color, from, to, ..
            } => write!(f, "smooth {} from {} to {}", color, from, to),
            Self::Flash {
                color,
                brightness,
                count,
                ..
            } => write!(f, "flash {} at {} x{}", color, brightness, count),
            Self::Rainbow { brightness, .. } => write!(f, "rainbow at {}", brightness),
            Self::Running {
                color, brightness, ..
            } => write!(f, "running {} at {}", color, brightness),
        }
    }
}

const RUNNING_PALETTE_LEN: usize = 7;

/// Single channels, then pairs, then all three.
fn running_palette(full: Color) -> [Color; RUNNING_PALETTE_LEN] {
    let Color { r, g, b } = full;
    [
        Color::new(r, 0, 0),
        Color::new(0, g, 0),
        Color::new(0, 0, b),
        Color::new(r, g, 0),
        Color::new(0, g, b),
        Color::new(r, 0, b),
        full,
    ]
}

/// Hold per pulse frame: the duration is split across the rise and the fall.
fn pulse_hold(duration: Duration, steps: u32) -> Duration {
    duration / steps.saturating_mul(2)
}

fn normalize(steps: u32) -> u32 {
    steps.max(1)
}

/// `from + i/steps * (to - from)`, exact at both ends.
fn ramp(from: f64, to: f64, i: u32, steps: u32) -> Brightness {
    if i == steps {
        return Brightness::new(to);
    }
    Brightness::new(from + f64::from(i) / f64::from(steps) * (to - from))
}
