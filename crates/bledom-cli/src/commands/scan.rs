//! Scan command implementation.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use bledom_core::{DiscoveredController, ScanOptions, scan_with_options};

use crate::cli::OutputFormat;
use crate::style;

pub async fn cmd_scan(
    timeout: u64,
    format: OutputFormat,
    all: bool,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    let spinner = if !quiet && format == OutputFormat::Text && io::stderr().is_terminal() {
        Some(style::scanning_spinner(timeout))
    } else {
        None
    };

    let mut options = ScanOptions::default().duration_secs(timeout);
    if all {
        options = options.all_devices();
    }

    let result = scan_with_options(options).await;

    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    let controllers = result.context("Failed to scan for controllers")?;

    let content = match format {
        OutputFormat::Json => format_scan_json(&controllers)?,
        OutputFormat::Text => format_scan_text(&controllers, no_color),
    };

    let mut stdout = io::stdout();
    write!(stdout, "{}", content)?;
    stdout.flush()?;
    Ok(())
}

fn format_scan_json(controllers: &[DiscoveredController]) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(controllers).context("Failed to serialize scan results")?;
    json.push('\n');
    Ok(json)
}

fn format_scan_text(controllers: &[DiscoveredController], no_color: bool) -> String {
    if controllers.is_empty() {
        return format!(
            "{}\n",
            style::format_warning("No controllers found. Is the strip powered on?", no_color)
        );
    }

    let mut out = format!(
        "{}\n",
        style::format_title(
            &format!("Found {} controller(s)", controllers.len()),
            no_color
        )
    );
    for controller in controllers {
        out.push_str(&format_scan_row(
            controller.name.as_deref(),
            &controller.identifier,
            controller.rssi,
            no_color,
        ));
        out.push('\n');
    }
    out
}

fn format_scan_row(
    name: Option<&str>,
    identifier: &str,
    rssi: Option<i16>,
    no_color: bool,
) -> String {
    format!(
        "{:<20} {:<38} {}",
        name.unwrap_or("Unknown"),
        identifier,
        style::format_signal_bar(rssi, no_color)
    )
}
