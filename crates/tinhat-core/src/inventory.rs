//! Bluetooth inventory parsing.
//!
//! `system_profiler SPBluetoothDataType` prints an indented, human-oriented
//! report. This module rebuilds [`DeviceRecord`]s from it with a single pass
//! line state machine. Indentation is ignored; only markers inside each
//! trimmed line matter:
//!
//! | Line | Effect |
//! |------|--------|
//! | contains `Connected:` but not `Not Connected` | section becomes connected |
//! | contains `Not Connected:`, or `paired, not connected` in any case | section becomes nearby |
//! | ends with `:` and mentions neither `Address` nor `Battery` | device header: flush, start a new device |
//! | contains `Address:` | address = text after the last `Address:` |
//! | contains `Minor Type:` | type = text after the first colon |
//! | contains `Battery Level:` | battery = text after the first colon |
//!
//! A device is emitted when the next header arrives or the input ends, into
//! the section active at that moment. Devices without an address, or seen
//! before any section marker, are dropped. Duplicates are kept.
//!
//! # Example
//!
//! ```
//! use tinhat_core::parse_inventory;
//!
//! let text = "Connected:\n  Magic Keyboard:\n    Address: AA:BB:CC:DD:EE:FF\n    Minor Type: Keyboard\n";
//! let inventory = parse_inventory(text);
//! assert_eq!(inventory.connected.len(), 1);
//! assert_eq!(inventory.connected[0].name, "Magic Keyboard");
//! assert!(inventory.nearby.is_empty());
//! ```

use tinhat_types::{DeviceRecord, Inventory, UNKNOWN};
use tracing::trace;

const CONNECTED_MARKER: &str = "Connected:";
const NOT_CONNECTED: &str = "Not Connected";
const NOT_CONNECTED_MARKER: &str = "Not Connected:";
const PAIRED_NOT_CONNECTED: &str = "paired, not connected";
const ADDRESS_MARKER: &str = "Address:";
const MINOR_TYPE_MARKER: &str = "Minor Type:";
const BATTERY_MARKER: &str = "Battery Level:";

/// Inventory section a device is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Connected,
    Nearby,
}

/// Fields collected for the device currently being read.
#[derive(Debug, Default)]
struct PartialDevice {
    name: Option<String>,
    address: Option<String>,
    device_type: Option<String>,
    battery: Option<String>,
}

impl PartialDevice {
    fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn into_record(self, section: Section) -> Option<DeviceRecord> {
        let address = self.address.filter(|a| !a.is_empty())?;
        Some(DeviceRecord {
            name: self.name.unwrap_or_else(|| UNKNOWN.to_string()),
            address,
            device_type: self.device_type.unwrap_or_else(|| UNKNOWN.to_string()),
            connected: section == Section::Connected,
            battery: self.battery,
        })
    }
}

/// Incremental inventory parser.
///
/// Feed lines in order with [`InventoryParser::feed`], then call
/// [`InventoryParser::finish`]. [`parse_inventory`] does both for a whole
/// document.
#[derive(Debug, Default)]
pub struct InventoryParser {
    section: Option<Section>,
    current: PartialDevice,
    inventory: Inventory,
}

impl InventoryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section currently in effect, if any marker has been seen.
    pub fn section(&self) -> Option<Section> {
        self.section
    }

    /// Process one line of inventory output.
    pub fn feed(&mut self, line: &str) {
        let line = line.trim();

        if line.contains(CONNECTED_MARKER) && !line.contains(NOT_CONNECTED) {
            self.section = Some(Section::Connected);
        } else if line.contains(NOT_CONNECTED_MARKER)
            || line.to_lowercase().contains(PAIRED_NOT_CONNECTED)
        {
            self.section = Some(Section::Nearby);
        } else if let Some(name) = header_name(line) {
            self.flush();
            self.current = PartialDevice::named(name);
        } else if line.contains(ADDRESS_MARKER) {
            self.current.address = after_last(line, ADDRESS_MARKER).map(str::to_string);
        } else if line.contains(MINOR_TYPE_MARKER) {
            self.current.device_type = after_first_colon(line).map(str::to_string);
        } else if line.contains(BATTERY_MARKER) {
            self.current.battery = after_first_colon(line).map(str::to_string);
        }
    }

    /// Flush the last device and return the collected inventory.
    pub fn finish(mut self) -> Inventory {
        self.flush();
        self.inventory
    }

    fn flush(&mut self) {
        let current = std::mem::take(&mut self.current);
        let Some(section) = self.section else {
            if current.address.is_some() {
                trace!("Dropping device {:?} seen before any section", current.name);
            }
            return;
        };

        if let Some(record) = current.into_record(section) {
            match section {
                Section::Connected => self.inventory.connected.push(record),
                Section::Nearby => self.inventory.nearby.push(record),
            }
        }
    }
}

/// Parse a full `system_profiler SPBluetoothDataType` report.
///
/// Never fails: unrecognised lines are ignored and incomplete device blocks
/// are dropped.
pub fn parse_inventory(text: &str) -> Inventory {
    let mut parser = InventoryParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

fn header_name(line: &str) -> Option<&str> {
    if line.contains("Address") || line.contains("Battery") {
        return None;
    }
    line.strip_suffix(':')
}

fn after_last<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.rfind(marker).map(|i| line[i + marker.len()..].trim())
}

fn after_first_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, rest)| rest.trim())
}
