//! Example: Playing an Animation
//!
//! Connects to the first controller and runs a rainbow followed by a
//! red pulse.
//!
//! Run with: `cargo run --example play_animation -- [NAME_OR_ADDRESS]`

use std::env;

use bledom_core::{AnimationSpec, Controller, Player};
use bledom_types::{Brightness, Color};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let target = env::args().nth(1).unwrap_or_else(|| "ELK".to_string());
    println!("Connecting to {}...", target);

    let controller = Controller::connect(&target).await?;
    println!("Connected to {:?}", controller.name());

    let mut player = Player::new(&controller);
    for spec in [
        AnimationSpec::rainbow(Brightness::from_percent(60)),
        AnimationSpec::pulse(Color::RED, Brightness::FULL),
    ] {
        let report = player.play(&spec).await;
        println!(
            "{}: {} sent, {} failed",
            spec, report.frames_sent, report.frames_failed
        );
    }

    controller.disconnect().await?;
    Ok(())
}
