//! Example: Connecting and disconnecting a device
//!
//! Pass a Bluetooth address and an action:
//!
//! Run with: `cargo run --example device_control -- AA:BB:CC:DD:EE:FF disconnect`
//!
//! Requires `blueutil` (`brew install blueutil`).

use tinhat_core::{DeviceAction, Toolkit};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let address = args.next().ok_or("usage: device_control <address> [connect|disconnect]")?;
    let action = match args.next().as_deref() {
        Some("connect") | None => DeviceAction::Connect,
        Some("disconnect") => DeviceAction::Disconnect,
        Some(other) => return Err(format!("unknown action: {}", other).into()),
    };

    let mut toolkit = Toolkit::system();
    match toolkit.try_control(action, &address).await {
        Ok(()) => println!("{} {}: ok", action, address),
        Err(e) => println!("{} {}: {}", action, address, e),
    }

    let inventory = toolkit.scan_bluetooth().await;
    match inventory.find(&address) {
        Some(device) => println!(
            "{} is now {}",
            device.name,
            if device.connected { "connected" } else { "not connected" }
        ),
        None => println!("{} is not in the inventory", address),
    }

    Ok(())
}
