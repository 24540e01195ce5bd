//! CLI argument definitions using clap.

use std::num::IntErrorKind;

use bledom_types::{Brightness, Color};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Red, green and blue channels as given on the command line.
///
/// Values outside 0..=255 are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct ColorArgs {
    /// Red channel (0-255)
    #[arg(allow_negative_numbers = true, value_parser = parse_level)]
    pub red: i64,

    /// Green channel (0-255)
    #[arg(allow_negative_numbers = true, value_parser = parse_level)]
    pub green: i64,

    /// Blue channel (0-255)
    #[arg(allow_negative_numbers = true, value_parser = parse_level)]
    pub blue: i64,
}

impl ColorArgs {
    pub fn color(&self) -> Color {
        Color::clamped(self.red, self.green, self.blue)
    }
}

/// Optional trailing brightness percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct BrightnessArg {
    /// Brightness in percent (0-100)
    #[arg(default_value_t = 100, allow_negative_numbers = true, value_parser = parse_level)]
    pub brightness: i64,
}

impl BrightnessArg {
    pub fn brightness(&self) -> Brightness {
        Brightness::from_percent(self.brightness)
    }
}

/// Parse an integer, saturating values too large for `i64`.
///
/// Range limits are applied later by clamping, so only non-numeric input
/// is an error here.
fn parse_level(s: &str) -> Result<i64, String> {
    s.trim().parse::<i64>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(format!("'{}' is not a whole number", s)),
    })
}

#[derive(Debug, Parser)]
#[command(name = "bledom")]
#[command(author, version, about = "CLI for ELK-BLEDOM Bluetooth LED strip controllers", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Controller name prefix or address, or use BLEDOM_DEVICE env var
    #[arg(short, long, global = true, env = "BLEDOM_DEVICE")]
    pub device: Option<String>,

    /// How long to scan for the controller, in seconds
    #[arg(short = 'T', long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Full white
    On,

    /// Lights off
    Off,

    /// Full red
    Red,

    /// Full green
    Green,

    /// Full blue
    Blue,

    /// Static color with brightness compensation
    Rgb {
        #[command(flatten)]
        color: ColorArgs,

        #[command(flatten)]
        brightness: BrightnessArg,
    },

    /// Breathe a color up to full brightness and back down
    Pulse {
        #[command(flatten)]
        color: ColorArgs,

        #[command(flatten)]
        brightness: BrightnessArg,
    },

    /// Fade a color from one brightness to another
    Smooth {
        #[command(flatten)]
        color: ColorArgs,

        /// Starting brightness in percent (0-100)
        #[arg(default_value_t = 0, allow_negative_numbers = true, value_parser = parse_level)]
        from: i64,

        /// Final brightness in percent (0-100)
        #[arg(default_value_t = 100, allow_negative_numbers = true, value_parser = parse_level)]
        to: i64,
    },

    /// Blink a color on and off
    Flash {
        #[command(flatten)]
        color: ColorArgs,

        #[command(flatten)]
        brightness: BrightnessArg,
    },

    /// Cycle through the hue wheel
    Rainbow {
        #[command(flatten)]
        brightness: BrightnessArg,
    },

    /// Chase through a seven-color palette, then settle on a color
    Running {
        #[command(flatten)]
        color: ColorArgs,

        #[command(flatten)]
        brightness: BrightnessArg,
    },

    /// Show available commands (default)
    Status,

    /// Scan for nearby controllers
    Scan {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// List every advertising device, not just LED controllers
        #[arg(short, long)]
        all: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bledom").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_parses() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_rgb_default_brightness() {
        let cli = parse(&["rgb", "255", "0", "0"]).unwrap();
        match cli.command {
            Some(Commands::Rgb { color, brightness }) => {
                assert_eq!(color.color(), Color::RED);
                assert_eq!(brightness.brightness(), Brightness::FULL);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let cli = parse(&["rgb", "300", "-5", "128", "150"]).unwrap();
        match cli.command {
            Some(Commands::Rgb { color, brightness }) => {
                assert_eq!(color.color(), Color::new(255, 0, 128));
                assert_eq!(brightness.brightness(), Brightness::FULL);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        let err = parse(&["rgb", "red", "0", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_overflowing_values_saturate_then_clamp() {
        let cli = parse(&[
            "rgb",
            "99999999999999999999",
            "-99999999999999999999",
            "7",
            "99999999999999999999",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Rgb { color, brightness }) => {
                assert_eq!(color.color(), Color::new(255, 0, 7));
                assert_eq!(brightness.brightness(), Brightness::FULL);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("42"), Ok(42));
        assert_eq!(parse_level("-7"), Ok(-7));
        assert_eq!(parse_level("99999999999999999999"), Ok(i64::MAX));
        assert_eq!(parse_level("-99999999999999999999"), Ok(i64::MIN));
        assert!(parse_level("").is_err());
        assert!(parse_level("12.5").is_err());
        assert!(parse_level("1e3").is_err());
        assert!(parse_level("red").is_err());
    }

    #[test]
    fn test_missing_channel_is_rejected() {
        assert!(parse(&["pulse", "255", "0"]).is_err());
    }

    #[test]
    fn test_smooth_defaults() {
        let cli = parse(&["smooth", "0", "0", "255"]).unwrap();
        match cli.command {
            Some(Commands::Smooth { from, to, .. }) => {
                assert_eq!(from, 0);
                assert_eq!(to, 100);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = parse(&["smooth", "0", "0", "255", "80", "-10"]).unwrap();
        match cli.command {
            Some(Commands::Smooth { from, to, .. }) => {
                assert_eq!(from, 80);
                assert_eq!(to, -10);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["rainbow", "40", "-d", "ELK-BLE", "-T", "5", "-q"]).unwrap();
        assert_eq!(cli.device.as_deref(), Some("ELK-BLE"));
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Some(Commands::Rainbow {
                brightness: BrightnessArg { brightness: 40 }
            })
        ));
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(parse(&["-q", "-v", "off"]).is_err());
    }

    #[test]
    fn test_scan_json() {
        let cli = parse(&["scan", "--format", "json", "--all"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Scan {
                format: OutputFormat::Json,
                all: true
            })
        );
    }
}
