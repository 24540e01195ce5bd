//! Core BLE library for ELK-BLEDOM LED controllers.
//!
//! This crate turns a lighting intent into timed frames on the wire. It
//! builds on the pure encoding in [`bledom_types`] and adds:
//!
//! - **Animations**: pulse, smooth fade, flash, rainbow and running light,
//!   each expanded into an exact frame sequence ([`AnimationSpec`])
//! - **Playback**: a [`Player`] that writes each frame and waits its hold time
//! - **Transport**: the narrow [`Transport`] seam, with an acknowledged write
//!   that falls back to an unacknowledged one ([`send_frame`])
//! - **Discovery**: finding a controller by name prefix or address
//! - **Connection**: the btleplug-backed [`Controller`]
//! - **Testing**: a recording [`MockTransport`]
//!
//! # Platform Differences
//!
//! - **macOS**: peripherals are identified by a CoreBluetooth UUID that is
//!   stable per Mac but not the device's MAC address.
//! - **Linux/Windows**: peripherals are identified by their Bluetooth address
//!   (e.g. `BE:59:7A:00:12:34`).
//!
//! # Quick Start
//!
//! ```no_run
//! use bledom_core::{AnimationSpec, Controller, Player};
//! use bledom_types::{Brightness, Color};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = Controller::connect("ELK").await?;
//!
//!     let mut player = Player::new(&controller);
//!     player
//!         .play(&AnimationSpec::pulse(Color::RED, Brightness::from_percent(60)))
//!         .await;
//!
//!     controller.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod device;
pub mod engine;
pub mod error;
pub mod mock;
pub mod scan;
pub mod transport;
pub mod util;

// Core exports
pub use animation::{AnimationSpec, AnimationStep};
pub use device::{ConnectionConfig, Controller};
pub use engine::{PlaybackReport, PlaybackState, Player, play};
pub use error::{DeviceNotFoundReason, Error, Result};
pub use mock::{MockTransport, RecordedWrite};
pub use scan::{DiscoveredController, Discovery, ScanOptions, find_controller, scan_with_options};
pub use transport::{Connection, Transport, WriteMode, send_frame};
pub use util::{create_identifier, format_peripheral_id};

// Re-export from bledom-types
pub use bledom_types::uuids;
pub use bledom_types::{Brightness, Color, Frame};
