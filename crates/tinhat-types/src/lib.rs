//! Platform-agnostic record types for the tinhat inventory toolkit.
//!
//! This crate holds the data model shared by the parser and control
//! library (tinhat-core) and the command-line front end (tinhat-cli).
//!
//! # Features
//!
//! - Bluetooth device records partitioned into connected and nearby
//! - WiFi network records with signal quality and distance helpers
//! - A validated [`BluetoothAddress`] type
//! - Error types for value parsing
//!
//! # Example
//!
//! ```
//! use tinhat_types::{BluetoothAddress, DeviceKind, DeviceRecord};
//!
//! let record = DeviceRecord::new("AA:BB:CC:DD:EE:FF", true).with_type("Headphones");
//! assert_eq!(record.kind(), DeviceKind::Headphones);
//!
//! let addr: BluetoothAddress = record.address.parse().unwrap();
//! assert_eq!(addr.canonical(), "AA:BB:CC:DD:EE:FF");
//! ```

pub mod address;
pub mod error;
pub mod types;

pub use address::{BluetoothAddress, is_valid_address};
pub use error::{ParseError, ParseResult};
pub use types::{
    DEFAULT_TX_POWER, DeviceKind, DeviceRecord, Inventory, NetworkRecord, RSSI_FLOOR,
    SignalStrength, UNKNOWN, estimate_distance,
};
