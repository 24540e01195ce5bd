//! Lighting commands: static colors and animations.

use std::time::Duration;

use anyhow::Result;
use bledom_core::{AnimationSpec, ConnectionConfig};
use bledom_types::{Brightness, Color};

use crate::cli::Commands;
use crate::config::AnimationConfig;
use crate::util::run_on_controller;

/// Translate a lighting command into the animation it plays.
///
/// `on`, `off` and the primary colors are sent as-is. Everything that takes
/// a brightness goes through compensation. Returns `None` for commands that
/// do not touch the lights.
pub fn animation_for(command: &Commands, timing: &AnimationConfig) -> Option<AnimationSpec> {
    let spec = match command {
        Commands::On => AnimationSpec::raw(Color::WHITE),
        Commands::Off => AnimationSpec::raw(Color::BLACK),
        Commands::Red => AnimationSpec::raw(Color::RED),
        Commands::Green => AnimationSpec::raw(Color::GREEN),
        Commands::Blue => AnimationSpec::raw(Color::BLUE),
        Commands::Rgb { color, brightness } => {
            AnimationSpec::set_color(color.color(), brightness.brightness())
        }
        Commands::Pulse { color, brightness } => AnimationSpec::Pulse {
            color: color.color(),
            brightness: brightness.brightness(),
            duration: Duration::from_millis(timing.pulse_duration_ms),
            steps: timing.pulse_steps,
        },
        Commands::Smooth { color, from, to } => AnimationSpec::Smooth {
            color: color.color(),
            from: Brightness::from_percent(*from),
            to: Brightness::from_percent(*to),
            duration: Duration::from_millis(timing.smooth_duration_ms),
            steps: timing.smooth_steps,
        },
        Commands::Flash { color, brightness } => AnimationSpec::Flash {
            color: color.color(),
            brightness: brightness.brightness(),
            count: timing.flash_count,
            on_off_duration: Duration::from_millis(timing.flash_hold_ms),
        },
        Commands::Rainbow { brightness } => AnimationSpec::Rainbow {
            brightness: brightness.brightness(),
            duration: Duration::from_millis(timing.rainbow_duration_ms),
            steps: timing.rainbow_steps,
        },
        Commands::Running { color, brightness } => AnimationSpec::Running {
            color: color.color(),
            brightness: brightness.brightness(),
            duration: Duration::from_millis(timing.running_duration_ms),
            steps: timing.running_steps,
        },
        Commands::Status
        | Commands::Scan { .. }
        | Commands::Config { .. }
        | Commands::Completions { .. } => return None,
    };
    Some(spec)
}

pub async fn cmd_light(
    spec: &AnimationSpec,
    target: &str,
    connection: ConnectionConfig,
    settle: Duration,
    quiet: bool,
) -> Result<()> {
    tracing::debug!(
        "{} expands to {} frames over {:?}",
        spec,
        spec.frame_count(),
        spec.total_duration()
    );
    run_on_controller(target, connection, spec, settle, !quiet).await
}
