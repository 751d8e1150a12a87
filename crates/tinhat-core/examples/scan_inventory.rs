//! Example: Listing Bluetooth devices and WiFi networks
//!
//! This example runs the macOS inventory utilities once and prints what
//! they report. On other platforms, or without the utilities installed,
//! it prints empty lists.
//!
//! Run with: `cargo run --example scan_inventory`

use tinhat_core::Toolkit;
use tinhat_core::exposure::ExposureThresholds;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut toolkit = Toolkit::system();

    println!("Scanning Bluetooth inventory...");
    println!();

    let inventory = toolkit.scan_bluetooth().await;

    if inventory.is_empty() {
        println!("No Bluetooth devices found.");
        println!();
        println!("Make sure:");
        println!("  - You are on macOS");
        println!("  - Bluetooth is enabled on this computer");
    } else {
        println!("Connected ({}):", inventory.connected.len());
        for device in &inventory.connected {
            let battery = device.battery.as_deref().unwrap_or("N/A");
            println!("  {} [{}]", device.name, device.device_type);
            println!("    Address: {}", device.address);
            println!("    Battery: {}", battery);
        }
        println!();
        println!("Nearby ({}):", inventory.nearby.len());
        for device in &inventory.nearby {
            println!("  {} [{}] {}", device.name, device.device_type, device.address);
        }
    }

    let assessment = ExposureThresholds::default().assess(&inventory.connected);
    println!();
    println!("Exposure: {} (score {})", assessment.level, assessment.score);

    let networks = toolkit.scan_wifi().await;
    println!();
    println!("WiFi networks ({}):", networks.len());
    for net in networks.iter().take(10) {
        println!("  {:<32} {:>4} dBm  ch {:<3} {}", net.ssid, net.rssi, net.channel, net.security);
    }

    match toolkit.current_network().await {
        Some(ssid) => println!("Associated with: {}", ssid),
        None => println!("Not associated"),
    }
}
