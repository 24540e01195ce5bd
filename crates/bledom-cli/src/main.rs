use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod style;
mod util;

use cli::{Cli, Commands};
use commands::{animation_for, cmd_config, cmd_light, cmd_scan, cmd_status};
use config::{Config, resolve_device, resolve_scan_timeout};

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        verbose,
        quiet,
        no_color,
        device,
        timeout,
        command,
    } = Cli::parse();
    let command = command.unwrap_or(Commands::Status);

    // Completions go straight to stdout, before any logging is set up
    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "bledom", &mut io::stdout());
        return Ok(());
    }

    let filter = if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let no_color = no_color || config.no_color;
    let target = resolve_device(device, &config);
    let scan_timeout = resolve_scan_timeout(timeout, &config);

    match command {
        Commands::Status => cmd_status(&target, scan_timeout, no_color),
        Commands::Scan { format, all } => {
            cmd_scan(scan_timeout, format, all, quiet, no_color).await
        }
        Commands::Config { action } => cmd_config(action, &config, no_color),
        Commands::Completions { .. } => Ok(()),
        light => match animation_for(&light, &config.animation) {
            Some(spec) => {
                cmd_light(
                    &spec,
                    &target,
                    config.connection_config(scan_timeout),
                    config.settle_delay(),
                    quiet,
                )
                .await
            }
            None => Ok(()),
        },
    }
}
