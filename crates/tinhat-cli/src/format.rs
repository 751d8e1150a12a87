//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tinhat_core::{Assessment, DeviceRecord, Inventory, NetworkRecord, Proximity};
use tinhat_types::SignalStrength;

use crate::cli::StyleMode;
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        Self {
            no_color: no_color || style == StyleMode::Plain,
            style,
            ..Self::default()
        }
    }

    /// Check if rich styling is enabled.
    pub fn is_rich(&self) -> bool {
        self.style == StyleMode::Rich
    }

    /// Check if plain styling is enabled (no decorations).
    pub fn is_plain(&self) -> bool {
        self.style == StyleMode::Plain
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// RFC 3339 timestamp for output.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| "???".to_string())
}

fn colored_name(name: &str, no_color: bool) -> String {
    if no_color {
        name.to_string()
    } else {
        format!("{}", name.cyan())
    }
}

// ============================================================================
// Bluetooth inventory
// ============================================================================

/// Format an inventory as tables, one per non-empty section.
#[must_use]
pub fn format_inventory_text(inventory: &Inventory, opts: &FormatOptions) -> String {
    use tabled::{Table, Tabled};

    if inventory.is_empty() {
        return "No Bluetooth devices found.\n".to_string();
    }

    #[derive(Tabled)]
    struct ConnectedRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        device_type: String,
        #[tabled(rename = "Battery")]
        battery: String,
        #[tabled(rename = "Address")]
        address: String,
    }

    #[derive(Tabled)]
    struct ConnectedRowRich {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        device_type: String,
        #[tabled(rename = "Battery")]
        battery: String,
        #[tabled(rename = "Distance")]
        distance: String,
        #[tabled(rename = "Risk")]
        risk: String,
        #[tabled(rename = "Address")]
        address: String,
    }

    #[derive(Tabled)]
    struct NearbyRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        device_type: String,
        #[tabled(rename = "Address")]
        address: String,
    }

    let mut output = String::new();

    if !inventory.connected.is_empty() {
        output.push_str(&section_header("Connected", inventory.connected.len(), opts));
        let mut table = if opts.is_rich() {
            Table::new(inventory.connected.iter().map(|d| {
                let proximity = Proximity::for_device(d);
                ConnectedRowRich {
                    name: colored_name(&d.name, opts.no_color),
                    device_type: d.device_type.clone(),
                    battery: style::format_battery(d.battery_percent(), opts.no_color),
                    distance: proximity.distance.to_string(),
                    risk: style::format_risk(proximity.risk, opts.no_color),
                    address: d.address.clone(),
                }
            }))
        } else {
            Table::new(inventory.connected.iter().map(|d| ConnectedRow {
                name: colored_name(&d.name, opts.no_color),
                device_type: d.device_type.clone(),
                battery: d.battery.clone().unwrap_or_else(|| "-".to_string()),
                address: d.address.clone(),
            }))
        };
        style::apply_table_style(&mut table, opts.style);
        output.push_str(&format!("{}\n", table));
    }

    if !inventory.nearby.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&section_header("Nearby", inventory.nearby.len(), opts));
        let mut table = Table::new(inventory.nearby.iter().map(|d| NearbyRow {
            name: colored_name(&d.name, opts.no_color),
            device_type: d.device_type.clone(),
            address: d.address.clone(),
        }));
        style::apply_table_style(&mut table, opts.style);
        output.push_str(&format!("{}\n", table));
    }

    output
}

fn section_header(title: &str, count: usize, opts: &FormatOptions) -> String {
    if opts.no_color {
        format!("{} ({})\n", title, count)
    } else {
        format!("{} ({})\n", title.bold(), count.to_string().green())
    }
}

pub fn format_inventory_json(inventory: &Inventory, opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct InventoryJson<'a> {
        count: usize,
        connected: &'a [DeviceRecord],
        nearby: &'a [DeviceRecord],
    }

    opts.as_json(&InventoryJson {
        count: inventory.len(),
        connected: &inventory.connected,
        nearby: &inventory.nearby,
    })
}

#[must_use]
pub fn format_inventory_csv(inventory: &Inventory, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "name,address,type,connected,battery\n".to_string()
    };
    for device in inventory.iter() {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_escape(&device.name),
            csv_escape(&device.address),
            csv_escape(&device.device_type),
            device.connected,
            csv_escape(device.battery.as_deref().unwrap_or(""))
        ));
    }
    output
}

// ============================================================================
// WiFi
// ============================================================================

#[must_use]
pub fn format_networks_text(networks: &[NetworkRecord], opts: &FormatOptions) -> String {
    use tabled::{Table, Tabled};

    if networks.is_empty() {
        return "No WiFi networks found.\n".to_string();
    }

    #[derive(Tabled)]
    struct NetworkRow {
        #[tabled(rename = "SSID")]
        ssid: String,
        #[tabled(rename = "Signal")]
        signal: String,
        #[tabled(rename = "Channel")]
        channel: u32,
        #[tabled(rename = "Security")]
        security: String,
        #[tabled(rename = "BSSID")]
        bssid: String,
    }

    let rows = networks.iter().map(|n| NetworkRow {
        ssid: colored_name(&n.ssid, opts.no_color),
        signal: if opts.is_plain() {
            n.rssi.to_string()
        } else {
            style::format_signal_bar(n.signal_quality(), n.rssi, opts.no_color)
        },
        channel: n.channel,
        security: n.security.clone(),
        bssid: n.bssid.clone(),
    });

    let mut table = Table::new(rows);
    style::apply_table_style(&mut table, opts.style);

    format!(
        "{}{}\n",
        section_header("Networks", networks.len(), opts),
        table
    )
}

pub fn format_networks_json(networks: &[NetworkRecord], opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct NetworksJson<'a> {
        count: usize,
        networks: Vec<NetworkJson<'a>>,
    }

    opts.as_json(&NetworksJson {
        count: networks.len(),
        networks: networks.iter().map(NetworkJson::from).collect(),
    })
}

/// A network with its derived signal figures.
#[derive(Debug, Serialize)]
pub struct NetworkJson<'a> {
    #[serde(flatten)]
    pub network: &'a NetworkRecord,
    pub signal_quality: u8,
    pub strength: SignalStrength,
}

impl<'a> From<&'a NetworkRecord> for NetworkJson<'a> {
    fn from(network: &'a NetworkRecord) -> Self {
        Self {
            network,
            signal_quality: network.signal_quality(),
            strength: network.strength(),
        }
    }
}

#[must_use]
pub fn format_networks_csv(networks: &[NetworkRecord], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "ssid,bssid,rssi,channel,security,signal_quality\n".to_string()
    };
    for n in networks {
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_escape(&n.ssid),
            csv_escape(&n.bssid),
            n.rssi,
            n.channel,
            csv_escape(&n.security),
            n.signal_quality()
        ));
    }
    output
}

/// WiFi radio and association state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiStatus {
    pub interface: String,
    pub power: bool,
    pub network: Option<String>,
}

#[must_use]
pub fn format_wifi_status_text(status: &WifiStatus, opts: &FormatOptions) -> String {
    let power = match (status.power, opts.no_color) {
        (true, true) => "On".to_string(),
        (false, true) => "Off".to_string(),
        (true, false) => format!("{}", "On".green()),
        (false, false) => format!("{}", "Off".red()),
    };
    let network = match &status.network {
        Some(ssid) => colored_name(ssid, opts.no_color),
        None => "(not associated)".to_string(),
    };
    format!(
        "Interface: {}\nPower:     {}\nNetwork:   {}\n",
        status.interface, power, network
    )
}

#[must_use]
pub fn format_wifi_status_csv(status: &WifiStatus, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "interface,power,network\n".to_string()
    };
    output.push_str(&format!(
        "{},{},{}\n",
        csv_escape(&status.interface),
        status.power,
        csv_escape(status.network.as_deref().unwrap_or(""))
    ));
    output
}

// ============================================================================
// Watch
// ============================================================================

/// One line per poll: time, exposure badge and connected devices.
#[must_use]
pub fn format_watch_line(
    at: OffsetDateTime,
    inventory: &Inventory,
    assessment: &Assessment,
    opts: &FormatOptions,
) -> String {
    let names: Vec<&str> = inventory.connected.iter().map(|d| d.name.as_str()).collect();
    let devices = if names.is_empty() {
        "no devices connected".to_string()
    } else {
        names.join(", ")
    };
    let time = format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second());
    let time = if opts.no_color {
        time
    } else {
        format!("{}", time.dimmed())
    };
    format!(
        "{} {} score {} | {} connected: {}\n",
        time,
        style::format_exposure(assessment.level, opts.no_color),
        assessment.score,
        assessment.device_count,
        devices
    )
}

#[must_use]
pub fn format_watch_csv_header(opts: &FormatOptions) -> String {
    if opts.no_header {
        String::new()
    } else {
        "timestamp,level,score,connected,devices\n".to_string()
    }
}

#[must_use]
pub fn format_watch_csv_line(
    at: OffsetDateTime,
    inventory: &Inventory,
    assessment: &Assessment,
) -> String {
    let names: Vec<&str> = inventory.connected.iter().map(|d| d.name.as_str()).collect();
    format!(
        "{},{},{},{},{}\n",
        format_timestamp(at),
        assessment.level,
        assessment.score,
        assessment.device_count,
        csv_escape(&names.join(";"))
    )
}

/// One JSON object per poll.
pub fn format_watch_json(
    at: OffsetDateTime,
    inventory: &Inventory,
    assessment: &Assessment,
) -> Result<String> {
    #[derive(Serialize)]
    struct WatchJson<'a> {
        timestamp: String,
        #[serde(flatten)]
        assessment: &'a Assessment,
        connected: &'a [DeviceRecord],
    }

    // One object per line regardless of --compact
    let line = serde_json::to_string(&WatchJson {
        timestamp: format_timestamp(at),
        assessment,
        connected: &inventory.connected,
    })?;
    Ok(line + "\n")
}

// ============================================================================
// Tests
// ============================================================================
