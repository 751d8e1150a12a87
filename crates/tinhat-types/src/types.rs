//! Device and network records rebuilt from system utility output.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placeholder used for a missing device name or type.
pub const UNKNOWN: &str = "Unknown";

/// RSSI reported for networks whose signal could not be read, in dBm.
///
/// Sorts after every real reading.
pub const RSSI_FLOOR: i32 = -100;

/// Reference transmit power at one metre used for distance estimates, in dBm.
pub const DEFAULT_TX_POWER: i32 = -59;

/// Category of a Bluetooth device, derived from its free-text minor type.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new kinds
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Headset,
    Headphones,
    Watch,
    Phone,
    Speaker,
    VideoDisplay,
    LaptopComputer,
    Tablet,
    /// Anything not recognised, including `"Unknown"`.
    Other,
}

impl DeviceKind {
    /// Map a minor-type string to a kind.
    ///
    /// Exact names reported by the inventory utility are matched first
    /// (case-insensitive). Otherwise the text is searched for a
    /// recognisable word, so `"Stereo Headphones"` is still
    /// [`DeviceKind::Headphones`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tinhat_types::DeviceKind;
    ///
    /// assert_eq!(DeviceKind::from_type("Keyboard"), DeviceKind::Keyboard);
    /// assert_eq!(DeviceKind::from_type("Laptop Computer"), DeviceKind::LaptopComputer);
    /// assert_eq!(DeviceKind::from_type("Gaming Headset"), DeviceKind::Headset);
    /// assert_eq!(DeviceKind::from_type("Unknown"), DeviceKind::Other);
    /// ```
    #[must_use]
    pub fn from_type(device_type: &str) -> Self {
        let lower = device_type.trim().to_lowercase();

        match lower.as_str() {
            "keyboard" => return Self::Keyboard,
            "mouse" | "trackpad" => return Self::Mouse,
            "headset" => return Self::Headset,
            "headphones" => return Self::Headphones,
            "watch" => return Self::Watch,
            "phone" => return Self::Phone,
            "speaker" => return Self::Speaker,
            "video display" => return Self::VideoDisplay,
            "laptop computer" => return Self::LaptopComputer,
            "tablet" => return Self::Tablet,
            _ => {}
        }

        // Headphones before phone: "headphones" contains "phone".
        if lower.contains("headset") {
            Self::Headset
        } else if lower.contains("headphone") {
            Self::Headphones
        } else if contains_word(&lower, "watch") {
            Self::Watch
        } else if contains_word(&lower, "phone") || lower.contains("smartphone") {
            Self::Phone
        } else if contains_word(&lower, "keyboard") {
            Self::Keyboard
        } else if contains_word(&lower, "mouse") {
            Self::Mouse
        } else if lower.contains("speaker") {
            Self::Speaker
        } else {
            Self::Other
        }
    }

    /// Short human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::Headset => "Headset",
            Self::Headphones => "Headphones",
            Self::Watch => "Watch",
            Self::Phone => "Phone",
            Self::Speaker => "Speaker",
            Self::VideoDisplay => "Video Display",
            Self::LaptopComputer => "Laptop Computer",
            Self::Tablet => "Tablet",
            Self::Other => "Other",
        }
    }

    /// Returns `true` for devices worn on the head.
    #[must_use]
    pub fn is_head_worn(&self) -> bool {
        matches!(self, Self::Headset | Self::Headphones)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(pos, _)| {
        let before_ok = haystack[..pos]
            .chars()
            .last()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[pos + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// One Bluetooth device as reported by the system inventory.
///
/// Records are rebuilt on every scan and never mutated afterwards. The
/// `connected` flag reflects the inventory section the record was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceRecord {
    /// Display name, `"Unknown"` when the source gives none.
    pub name: String,
    /// Six-octet hardware address as printed by the source.
    pub address: String,
    /// Minor type text, verbatim. `"Unknown"` when absent.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub device_type: String,
    pub connected: bool,
    /// Raw battery text such as `"85%"`. Not normalized.
    #[cfg_attr(feature = "serde", serde(default))]
    pub battery: Option<String>,
}

impl DeviceRecord {
    /// Create a record with unknown name and type.
    #[must_use]
    pub fn new(address: impl Into<String>, connected: bool) -> Self {
        Self {
            name: UNKNOWN.to_string(),
            address: address.into(),
            device_type: UNKNOWN.to_string(),
            connected,
            battery: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the minor type text.
    #[must_use]
    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    /// Set the battery text.
    #[must_use]
    pub fn with_battery(mut self, battery: impl Into<String>) -> Self {
        self.battery = Some(battery.into());
        self
    }

    /// Category derived from [`DeviceRecord::device_type`].
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        DeviceKind::from_type(&self.device_type)
    }

    /// Battery percentage, if the battery text starts with a number.
    #[must_use]
    pub fn battery_percent(&self) -> Option<u8> {
        let text = self.battery.as_deref()?.trim();
        let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u8>().ok().filter(|p| *p <= 100)
    }
}

/// Result of one inventory scan, partitioned by connection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inventory {
    pub connected: Vec<DeviceRecord>,
    pub nearby: Vec<DeviceRecord>,
}

impl Inventory {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connected.is_empty() && self.nearby.is_empty()
    }

    /// Total record count across both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connected.len() + self.nearby.len()
    }

    /// Iterate connected records, then nearby ones.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.connected.iter().chain(self.nearby.iter())
    }

    /// Find the first record whose address matches, ignoring case and delimiter.
    #[must_use]
    pub fn find(&self, address: &str) -> Option<&DeviceRecord> {
        let wanted = normalize_address(address);
        self.iter().find(|d| normalize_address(&d.address) == wanted)
    }
}

fn normalize_address(address: &str) -> String {
    address
        .trim()
        .chars()
        .map(|c| if c == '-' { ':' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Coarse signal bucket used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignalStrength {
    Strong,
    Medium,
    Weak,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => write!(f, "Strong"),
            Self::Medium => write!(f, "Medium"),
            Self::Weak => write!(f, "Weak"),
        }
    }
}

/// One visible WiFi access point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkRecord {
    pub ssid: String,
    pub bssid: String,
    /// Signal strength in dBm; [`RSSI_FLOOR`] when unknown.
    pub rssi: i32,
    pub channel: u32,
    /// Security description, `"Open"` when none is advertised.
    pub security: String,
}

impl Default for NetworkRecord {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            bssid: String::new(),
            rssi: RSSI_FLOOR,
            channel: 0,
            security: "Open".to_string(),
        }
    }
}

impl NetworkRecord {
    /// Signal quality as a 0..=100 percentage: `(rssi + 100) * 2`, clamped.
    #[must_use]
    pub fn signal_quality(&self) -> u8 {
        // Clamp to 0..=100 before narrowing.
        (self.rssi.saturating_add(100).saturating_mul(2)).clamp(0, 100) as u8
    }

    #[must_use]
    pub fn strength(&self) -> SignalStrength {
        match self.signal_quality() {
            q if q > 70 => SignalStrength::Strong,
            q if q > 40 => SignalStrength::Medium,
            _ => SignalStrength::Weak,
        }
    }

    /// Estimated distance in metres from a free-space path loss model.
    ///
    /// Returns `None` when the RSSI is zero (no reading).
    #[must_use]
    pub fn estimated_distance(&self, tx_power: i32) -> Option<f64> {
        estimate_distance(self.rssi, tx_power)
    }

    /// Returns `true` when no SSID is broadcast.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty() || self.ssid == "(Hidden)"
    }
}

/// Log-distance estimate with path-loss exponent 2, rounded to 0.1 m.
///
/// # Examples
///
/// ```
/// use tinhat_types::{estimate_distance, DEFAULT_TX_POWER};
///
/// assert_eq!(estimate_distance(-59, DEFAULT_TX_POWER), Some(1.0));
/// assert_eq!(estimate_distance(-79, DEFAULT_TX_POWER), Some(10.0));
/// assert_eq!(estimate_distance(0, DEFAULT_TX_POWER), None);
/// ```
#[must_use]
pub fn estimate_distance(rssi: i32, tx_power: i32) -> Option<f64> {
    if rssi == 0 {
        return None;
    }
    let ratio = f64::from(tx_power - rssi) / 20.0;
    let metres = 10f64.powf(ratio);
    Some((metres * 10.0).round() / 10.0)
}
