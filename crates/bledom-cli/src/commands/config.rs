//! Config command implementation.

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::{
    Config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_SCAN_TIMEOUT, DEFAULT_SETTLE_MS,
};
use crate::style;

pub fn cmd_config(action: ConfigAction, config: &Config, no_color: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            println!("{}", content);
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
        ConfigAction::Init => {
            let path = Config::path();
            if path.exists() {
                println!(
                    "{}",
                    style::format_warning(
                        &format!("Config already exists at {}", path.display()),
                        no_color
                    )
                );
                return Ok(());
            }
            initial_config().save()?;
            println!(
                "{}",
                style::format_success(&format!("Created {}", path.display()), no_color)
            );
        }
    }
    Ok(())
}

/// A config with every setting spelled out at its default.
fn initial_config() -> Config {
    Config {
        device: Some(bledom_core::uuids::DEVICE_NAME_PREFIX.to_string()),
        scan_timeout: Some(DEFAULT_SCAN_TIMEOUT),
        connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
        settle_ms: Some(DEFAULT_SETTLE_MS),
        ..Default::default()
    }
}
