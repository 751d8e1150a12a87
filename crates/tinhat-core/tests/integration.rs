//! Integration tests for tinhat-core
//!
//! Most tests drive a [`Toolkit`] through a scripted [`MockRunner`] using
//! captured utility output, so they run anywhere.
//!
//! Tests marked `#[ignore]` call the real macOS utilities and should be run with:
//! `cargo test --package tinhat-core -- --ignored --nocapture`

use std::time::Duration;

use tinhat_core::{
    CacheKey, CommandSpec, DeviceAction, DeviceKind, ExposureLevel, MockRunner, SessionState,
    Toolkit, ToolkitOptions,
};
use time::OffsetDateTime;
use tokio::time::timeout;

const SYSTEM_PROFILER_OUTPUT: &str = r#"Bluetooth:

      Bluetooth Controller:
          Address: F0:18:98:AA:BB:CC
          State: On
          Chipset: BCM_4387
          Discoverable: Off
          Firmware Version: 21.1.522.1766
          Product ID: 0x4A1D
          Supported services: 0x392039 < HFP AVRCP A2DP HID Braille AACP GATT SerialPort >
          Transport: PCIe
          Vendor ID: 0x004C (Apple)
      Connected:
          Magic Keyboard with Touch ID:
              Address: 3C:A6:F6:11:22:33
              Vendor ID: 0x004C
              Product ID: 0x029C
              Battery Level: 85%
              Firmware Version: 2.0.6
              Minor Type: Keyboard
          AirPods Pro:
              Address: 6C:4A:85:44:55:66
              Vendor ID: 0x004C
              Product ID: 0x2014
              Case Battery Level: 52%
              Left Battery Level: 100%
              Right Battery Level: 98%
              Firmware Version: 6A321
              Minor Type: Headphones
              Serial Number: H3KXXXXXXX
      Not Connected:
          Living Room TV:
              Address: A8:51:AB:77:88:99
              Minor Type: Video Display
          Old Mouse:
              Address: 04:4B:ED:AA:00:11
              Vendor ID: 0x004C
              Minor Type: Mouse
"#;

fn scripted_toolkit() -> Toolkit<MockRunner> {
    let runner = MockRunner::builder()
        .success(CommandSpec::bluetooth_inventory(), SYSTEM_PROFILER_OUTPUT)
        .build();
    Toolkit::new(runner)
}

#[tokio::test]
async fn test_realistic_inventory_partitions() {
    let mut toolkit = scripted_toolkit();
    let inv = toolkit.scan_bluetooth().await;

    // A block is filed under the section active when it is flushed. The
    // controller is still open at "Connected:" and the AirPods block is
    // still open at "Not Connected:".
    let connected: Vec<_> = inv.connected.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(connected, ["Bluetooth Controller", "Magic Keyboard with Touch ID"]);

    let nearby: Vec<_> = inv.nearby.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(nearby, ["AirPods Pro", "Living Room TV", "Old Mouse"]);
    assert!(inv.nearby.iter().all(|d| !d.connected));
}

#[tokio::test]
async fn test_realistic_inventory_fields() {
    let mut toolkit = scripted_toolkit();
    let inv = toolkit.scan_bluetooth().await;

    let keyboard = inv.find("3C:A6:F6:11:22:33").unwrap();
    assert_eq!(keyboard.device_type, "Keyboard");
    assert_eq!(keyboard.battery.as_deref(), Some("85%"));
    assert!(keyboard.connected);

    // Several battery lines: the last one read wins.
    let pods = inv.find("6c:4a:85:44:55:66").unwrap();
    assert_eq!(pods.kind(), DeviceKind::Headphones);
    assert_eq!(pods.battery.as_deref(), Some("98%"));
    assert!(!pods.connected);

    let tv = inv.find("A8:51:AB:77:88:99").unwrap();
    assert_eq!(tv.kind(), DeviceKind::VideoDisplay);
    assert!(!tv.connected);
    assert_eq!(tv.battery, None);

    let controller = inv.find("F0:18:98:AA:BB:CC").unwrap();
    assert_eq!(controller.device_type, "Unknown");
}

#[tokio::test]
async fn test_disconnect_forces_fresh_scan() {
    let runner = MockRunner::builder()
        .success(CommandSpec::bluetooth_inventory(), SYSTEM_PROFILER_OUTPUT)
        .build();
    let disconnect = CommandSpec::device_action(
        DeviceAction::Disconnect,
        &"6C:4A:85:44:55:66".parse().unwrap(),
    );
    runner.on_success(&disconnect, "");
    let mut toolkit = Toolkit::new(runner);

    toolkit.scan_bluetooth().await;
    toolkit.scan_bluetooth().await;
    assert_eq!(
        toolkit.runner().count_for(&CommandSpec::bluetooth_inventory()),
        1
    );

    assert!(toolkit.disconnect("6C:4A:85:44:55:66").await);
    assert!(!toolkit.is_cached(CacheKey::BluetoothInventory));

    toolkit.scan_bluetooth().await;
    assert_eq!(
        toolkit.runner().count_for(&CommandSpec::bluetooth_inventory()),
        2
    );
}

#[tokio::test]
async fn test_invalid_address_never_reaches_blueutil() {
    let mut toolkit = scripted_toolkit();
    assert!(!toolkit.connect("bad-address").await);
    assert!(!toolkit.forget("6C:4A:85:44:55:66 --power 0").await);
    assert_eq!(toolkit.runner().count_program("blueutil"), 0);
}

#[tokio::test]
async fn test_session_tracks_exposure_over_polls() {
    let output = "Connected:\n  AirPods Pro:\n    Address: 6C:4A:85:44:55:66\n    Minor Type: Headphones\n  Magic Keyboard:\n    Address: 3C:A6:F6:11:22:33\n    Minor Type: Keyboard\n";
    let runner = MockRunner::builder()
        .success(CommandSpec::bluetooth_inventory(), output)
        .build();
    let mut toolkit = Toolkit::new(runner);
    let mut session = SessionState::new();
    let start = OffsetDateTime::UNIX_EPOCH;

    let inv = toolkit.scan_bluetooth().await;
    // headphones 3 + keyboard 1
    let assessment = session.record(&inv, start);
    assert_eq!(assessment.score, 4);
    assert_eq!(assessment.level, ExposureLevel::Moderate);

    let later = start + time::Duration::minutes(31);
    let inv = toolkit.scan_bluetooth().await;
    session.record(&inv, later);

    assert_eq!(session.exposure_log().len(), 2);
    assert!(session
        .headset_alert(Duration::from_secs(30 * 60), later)
        .is_some());
}

#[tokio::test]
async fn test_realistic_inventory_exposure() {
    let mut toolkit = scripted_toolkit();
    let inv = toolkit.scan_bluetooth().await;
    let mut session = SessionState::new();

    // controller 1 + keyboard 1
    let assessment = session.record(&inv, OffsetDateTime::UNIX_EPOCH);
    assert_eq!(assessment.score, 2);
    assert_eq!(assessment.level, ExposureLevel::Low);
    assert_eq!(session.headset_duration(OffsetDateTime::UNIX_EPOCH), None);
}

#[tokio::test]
async fn test_custom_options_reach_commands() {
    let options = ToolkitOptions::default()
        .interface("en7")
        .airport_path("/opt/airport");
    let runner = MockRunner::builder()
        .success(CommandSpec::wifi_power_state("en7"), "Wi-Fi Power (en7): On")
        .success(
            CommandSpec::wifi_scan("/opt/airport"),
            "SSID BSSID RSSI CHANNEL HT CC SECURITY\n",
        )
        .build();
    let mut toolkit = Toolkit::with_options(runner, options).unwrap();

    assert!(toolkit.wifi_power().await);
    assert!(toolkit.scan_wifi().await.is_empty());
    assert_eq!(toolkit.runner().invocation_count(), 2);
}

// --- Host tests ---

#[tokio::test]
#[ignore = "requires macOS with system_profiler"]
async fn test_host_bluetooth_scan() {
    let mut toolkit = Toolkit::system();
    let result = timeout(Duration::from_secs(30), toolkit.try_scan_bluetooth()).await;

    match result {
        Ok(Ok(inventory)) => {
            println!(
                "Found {} connected, {} nearby",
                inventory.connected.len(),
                inventory.nearby.len()
            );
            for device in inventory.iter() {
                println!("  {} ({}) {}", device.name, device.device_type, device.address);
            }
        }
        Ok(Err(e)) => panic!("Scan failed: {}", e),
        Err(_) => panic!("Scan timed out after 30 seconds"),
    }
}

#[tokio::test]
#[ignore = "requires macOS with networksetup"]
async fn test_host_wifi_status() {
    let mut toolkit = Toolkit::system();
    println!("WiFi power: {}", toolkit.wifi_power().await);
    println!("Current network: {:?}", toolkit.current_network().await);
}

#[tokio::test]
#[ignore = "requires blueutil"]
async fn test_host_discoverable() {
    let mut toolkit = Toolkit::system();
    println!("Discoverable: {}", toolkit.discoverable().await);
}
