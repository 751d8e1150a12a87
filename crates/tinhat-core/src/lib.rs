//! Bluetooth and WiFi inventory for macOS hosts.
//!
//! This crate turns the text output of the system utilities
//! (`system_profiler`, `blueutil`, `networksetup` and `airport`) into typed
//! records, caches the results for a short time, and drives device
//! connect/disconnect/forget requests.
//!
//! # Features
//!
//! - **Inventory parsing**: connected and nearby Bluetooth devices from
//!   `system_profiler SPBluetoothDataType`
//! - **WiFi helpers**: network scan, associated network, radio power
//! - **Device control**: connect, disconnect and forget, gated by address
//!   validation
//! - **TTL caching**: per-operation freshness with explicit invalidation
//! - **Exposure estimates**: a coarse score from connected device types
//! - **Session history**: a bounded exposure log for polling loops
//! - **Testability**: every external call goes through [`CommandRunner`];
//!   [`MockRunner`] scripts responses in tests
//!
//! # Failure model
//!
//! The plain [`Toolkit`] methods never return errors. A missing utility, a
//! non-zero exit or a timeout is logged through `tracing` and turned into
//! the documented fallback: an empty inventory, no networks, `false` for
//! control requests. Use the `try_*` methods when the cause matters.
//!
//! # Quick Start
//!
//! ```no_run
//! use tinhat_core::Toolkit;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut toolkit = Toolkit::system();
//!
//!     let inventory = toolkit.scan_bluetooth().await;
//!     for device in &inventory.connected {
//!         println!("{} ({}) {}", device.name, device.device_type, device.address);
//!     }
//!
//!     if let Some(first) = inventory.connected.first() {
//!         let ok = toolkit.disconnect(&first.address).await;
//!         println!("disconnect: {}", if ok { "ok" } else { "failed" });
//!     }
//! }
//! ```

pub mod cache;
pub mod commands;
pub mod control;
pub mod error;
pub mod exposure;
pub mod inventory;
pub mod mock;
pub mod runner;
pub mod scan;
pub mod session;
pub mod toolkit;
pub mod traits;
pub mod validation;
pub mod wifi;

// Re-export the record types
pub use tinhat_types::types;

// Core exports
pub use cache::TtlCache;
pub use commands::{CommandSpec, DeviceAction};
pub use error::{Error, Result};
pub use exposure::{Assessment, ExposureLevel, ExposureThresholds, Proximity, Risk};
pub use inventory::{InventoryParser, Section, parse_inventory};
pub use mock::{MockResponse, MockRunner, MockRunnerBuilder};
pub use runner::SystemRunner;
pub use session::{ExposureSample, SessionState};
pub use toolkit::{CacheKey, Toolkit, ToolkitOptions};
pub use traits::{CommandOutput, CommandRunner};
pub use validation::{is_valid_address, validate_address};
pub use wifi::{parse_network_scan, sort_by_signal};

// Re-export from tinhat-types
pub use tinhat_types::{
    BluetoothAddress, DeviceKind, DeviceRecord, Inventory, NetworkRecord, ParseError,
};
