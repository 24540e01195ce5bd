//! Utility functions for CLI operations.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::Result;
use bledom_core::{
    AnimationSpec, Connection, ConnectionConfig, Controller, Player, find_controller,
};
use tracing::{debug, error, info, warn};

use crate::style;

/// Find a controller and connect to it, showing a spinner on a terminal.
pub async fn connect_with_progress(
    target: &str,
    config: ConnectionConfig,
    show_progress: bool,
) -> Result<Controller> {
    let spinner = if show_progress && io::stderr().is_terminal() {
        Some(style::connecting_spinner(target))
    } else {
        None
    };

    let found = find_controller(target, config.scan_timeout).await;

    let (adapter, peripheral) = match found {
        Ok(found) => {
            if let Some(ref sp) = spinner {
                sp.set_message("Connecting...".to_string());
            }
            found
        }
        Err(e) => {
            if let Some(sp) = spinner {
                sp.finish_and_clear();
            }
            return Err(connect_error(
                format!("Failed to find controller: {}", target),
                e,
                &[
                    "Bluetooth may be disabled -- check system settings",
                    "The LED strip may be unpowered or out of range",
                    "A phone app may be holding the connection",
                    "The name or address may be wrong -- run 'bledom scan' to verify",
                ],
            ));
        }
    };

    let result = Controller::from_peripheral_with_config(adapter, peripheral, config).await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    result.map_err(|e| {
        connect_error(
            format!("Failed to connect to controller: {}", target),
            e,
            &[
                "The controller may have gone out of range",
                "A phone app may be holding the connection",
                "This may not be an ELK-BLEDOM controller",
            ],
        )
    })
}

fn connect_error(base_msg: String, cause: bledom_core::Error, causes: &[&str]) -> anyhow::Error {
    let mut suggestion = String::from("\n\nPossible causes:");
    for hint in causes {
        suggestion.push_str("\n  - ");
        suggestion.push_str(hint);
    }
    anyhow::anyhow!("{}\n\nCause: {}{}", base_msg, cause, suggestion)
}

/// Connect, play `spec`, pause for `settle`, then disconnect.
///
/// Failing to reach the controller is reported as "operation failed" and
/// is not an error for the process. Disconnect problems only warn.
pub async fn run_on_controller(
    target: &str,
    config: ConnectionConfig,
    spec: &AnimationSpec,
    settle: Duration,
    show_progress: bool,
) -> Result<()> {
    let connection = connect_with_progress(target, config, show_progress).await;
    play_and_release(connection, spec, settle).await
}

async fn play_and_release<C: Connection>(
    connection: Result<C>,
    spec: &AnimationSpec,
    settle: Duration,
) -> Result<()> {
    let connection = match connection {
        Ok(connection) => connection,
        Err(e) => {
            error!("operation failed: {}", e);
            return Ok(());
        }
    };

    info!("Playing {}", spec);
    let report = Player::new(&connection).play(spec).await;
    if report.is_clean() {
        debug!("All {} frames delivered", report.frames_sent);
    } else {
        warn!(
            "{} of {} frames could not be delivered",
            report.frames_failed,
            report.total()
        );
    }

    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }

    if let Err(e) = connection.disconnect().await {
        warn!("Disconnect failed: {}", e);
    }
    Ok(())
}
