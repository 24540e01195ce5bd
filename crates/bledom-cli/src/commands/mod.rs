//! Command implementations for the CLI.

mod config;
mod light;
mod scan;
mod status;

pub use config::cmd_config;
pub use light::{animation_for, cmd_light};
pub use scan::cmd_scan;
pub use status::cmd_status;
