//! Example: Scanning for ELK-BLEDOM Controllers
//!
//! Lists every LED controller advertising nearby.
//!
//! Run with: `cargo run --example scan_controllers`

use bledom_core::scan::{self, ScanOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Scanning for ELK-BLEDOM controllers...");
    println!();

    let options = ScanOptions::default().duration_secs(10);
    let controllers = scan::scan_with_options(options).await?;

    if controllers.is_empty() {
        println!("No controllers found.");
        println!();
        println!("Make sure:");
        println!("  - The LED strip is powered on");
        println!("  - Bluetooth is enabled on this computer");
        println!("  - No phone app is holding the connection");
    } else {
        println!("Found {} controller(s):", controllers.len());
        println!();

        for controller in &controllers {
            let name = controller.name.as_deref().unwrap_or("Unknown");
            let rssi = controller
                .rssi
                .map(|r| format!("{} dBm", r))
                .unwrap_or_else(|| "N/A".to_string());

            println!("  {}", name);
            println!("    Identifier: {}", controller.identifier);
            println!("    RSSI: {}", rssi);
            println!();
        }
    }

    Ok(())
}
