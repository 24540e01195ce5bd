//! Status command: the command overview plus the resolved target.

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::Cli;
use crate::config::Config;
use crate::style;

/// Print the command overview. Never touches Bluetooth.
pub fn cmd_status(target: &str, scan_timeout: u64, no_color: bool) -> Result<()> {
    let help = Cli::command().render_help();
    println!("{}", help);
    println!("{}", format_target_line(target, scan_timeout, no_color));
    println!("Config: {}", Config::path().display());
    Ok(())
}

fn format_target_line(target: &str, scan_timeout: u64, no_color: bool) -> String {
    style::format_success(
        &format!("Target: {} (scan timeout {}s)", target, scan_timeout),
        no_color,
    )
}
