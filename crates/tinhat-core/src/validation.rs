//! Input validation for values passed to external utilities.
//!
//! Every address that reaches a `blueutil` argument list goes through
//! [`validate_address`] first. Nothing else stands between user input and
//! the command line, so the check is a full-string match with no trimming.
//!
//! # Example
//!
//! ```
//! use tinhat_core::validation::validate_address;
//!
//! let addr = validate_address("AA:BB:CC:DD:EE:FF").unwrap();
//! assert_eq!(addr.as_str(), "AA:BB:CC:DD:EE:FF");
//!
//! assert!(validate_address("AA:BB:CC:DD:EE:FF; reboot").is_err());
//! ```

use tinhat_types::BluetoothAddress;
use tracing::warn;

use crate::error::Result;

pub use tinhat_types::is_valid_address;

/// Parse an address, logging and rejecting anything malformed.
pub fn validate_address(address: &str) -> Result<BluetoothAddress> {
    address.parse::<BluetoothAddress>().map_err(|e| {
        warn!("Rejected Bluetooth address {:?}", address);
        e.into()
    })
}
