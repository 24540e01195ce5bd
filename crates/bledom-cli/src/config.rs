//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bledom_core::ConnectionConfig;
use bledom_core::animation::{
    FLASH_COUNT, FLASH_HOLD, PULSE_DURATION, PULSE_STEPS, RAINBOW_DURATION, RAINBOW_STEPS,
    RUNNING_DURATION, RUNNING_STEPS, SMOOTH_DURATION, SMOOTH_STEPS,
};
use bledom_core::uuids::DEVICE_NAME_PREFIX;
use serde::{Deserialize, Serialize};

/// Default scan timeout in seconds.
pub const DEFAULT_SCAN_TIMEOUT: u64 = 15;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default pause before disconnecting, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 500;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default controller name prefix or address
    #[serde(default)]
    pub device: Option<String>,

    /// How long to look for the controller, in seconds
    #[serde(default)]
    pub scan_timeout: Option<u64>,

    /// Connection timeout in seconds
    #[serde(default)]
    pub connect_timeout: Option<u64>,

    /// Pause after the last frame before disconnecting, in milliseconds
    #[serde(default)]
    pub settle_ms: Option<u64>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Animation timing
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// Animation timing overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_pulse_duration_ms")]
    pub pulse_duration_ms: u64,
    #[serde(default = "default_pulse_steps")]
    pub pulse_steps: u32,
    #[serde(default = "default_smooth_duration_ms")]
    pub smooth_duration_ms: u64,
    #[serde(default = "default_smooth_steps")]
    pub smooth_steps: u32,
    #[serde(default = "default_flash_count")]
    pub flash_count: u32,
    #[serde(default = "default_flash_hold_ms")]
    pub flash_hold_ms: u64,
    #[serde(default = "default_rainbow_duration_ms")]
    pub rainbow_duration_ms: u64,
    #[serde(default = "default_rainbow_steps")]
    pub rainbow_steps: u32,
    #[serde(default = "default_running_duration_ms")]
    pub running_duration_ms: u64,
    #[serde(default = "default_running_steps")]
    pub running_steps: u32,
}

fn default_pulse_duration_ms() -> u64 {
    PULSE_DURATION.as_millis() as u64
}

fn default_pulse_steps() -> u32 {
    PULSE_STEPS
}

fn default_smooth_duration_ms() -> u64 {
    SMOOTH_DURATION.as_millis() as u64
}

fn default_smooth_steps() -> u32 {
    SMOOTH_STEPS
}

fn default_flash_count() -> u32 {
    FLASH_COUNT
}

fn default_flash_hold_ms() -> u64 {
    FLASH_HOLD.as_millis() as u64
}

fn default_rainbow_duration_ms() -> u64 {
    RAINBOW_DURATION.as_millis() as u64
}

fn default_rainbow_steps() -> u32 {
    RAINBOW_STEPS
}

fn default_running_duration_ms() -> u64 {
    RUNNING_DURATION.as_millis() as u64
}

fn default_running_steps() -> u32 {
    RUNNING_STEPS
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            pulse_duration_ms: default_pulse_duration_ms(),
            pulse_steps: default_pulse_steps(),
            smooth_duration_ms: default_smooth_duration_ms(),
            smooth_steps: default_smooth_steps(),
            flash_count: default_flash_count(),
            flash_hold_ms: default_flash_hold_ms(),
            rainbow_duration_ms: default_rainbow_duration_ms(),
            rainbow_steps: default_rainbow_steps(),
            running_duration_ms: default_running_duration_ms(),
            running_steps: default_running_steps(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bledom")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file
    /// prints a warning and also yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Pause after the last frame before disconnecting.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms.unwrap_or(DEFAULT_SETTLE_MS))
    }

    /// Connection timeouts, with the scan timeout already resolved.
    pub fn connection_config(&self, scan_timeout: u64) -> ConnectionConfig {
        ConnectionConfig::default()
            .scan_timeout(Duration::from_secs(scan_timeout))
            .connection_timeout(Duration::from_secs(
                self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            ))
    }
}

/// Resolve the controller from arg (or env var), then config, then the
/// default name prefix.
pub fn resolve_device(device: Option<String>, config: &Config) -> String {
    device
        .filter(|d| !d.is_empty())
        .or_else(|| config.device.clone())
        .unwrap_or_else(|| DEVICE_NAME_PREFIX.to_string())
}

/// Resolve the scan timeout: explicit flag, then config, then default.
pub fn resolve_scan_timeout(flag: Option<u64>, config: &Config) -> u64 {
    flag.or(config.scan_timeout).unwrap_or(DEFAULT_SCAN_TIMEOUT)
}
