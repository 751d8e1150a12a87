//! WiFi scan and status parsing.
//!
//! The `airport -s` report is fixed-width: the SSID occupies the first 32
//! columns (right-aligned), followed by whitespace-separated
//! `BSSID RSSI CHANNEL HT CC SECURITY...` columns.

use tinhat_types::NetworkRecord;
use tracing::trace;

/// Width of the SSID column in `airport -s` output.
pub const SSID_COLUMN_WIDTH: usize = 32;

/// Marker printed by `networksetup -getairportnetwork` when associated.
const CURRENT_NETWORK_MARKER: &str = "Current Wi-Fi Network:";

/// Parse `airport -s` output into network records, in source order.
///
/// The first line is a column header and is skipped. Rows shorter than the
/// SSID column, rows with fewer than four data columns, and rows whose RSSI
/// or channel is not an integer are skipped without aborting the parse.
pub fn parse_network_scan(text: &str) -> Vec<NetworkRecord> {
    text.trim()
        .lines()
        .skip(1)
        .filter_map(|line| {
            let row = parse_scan_row(line);
            if row.is_none() {
                trace!("Skipping malformed scan row: {:?}", line);
            }
            row
        })
        .collect()
}

fn parse_scan_row(line: &str) -> Option<NetworkRecord> {
    let split = line.char_indices().nth(SSID_COLUMN_WIDTH)?.0;
    let (ssid, rest) = line.split_at(split);

    let columns: Vec<&str> = rest.split_whitespace().collect();
    if columns.len() < 4 {
        return None;
    }

    let rssi = columns[1].parse::<i32>().ok()?;
    let channel = columns[2]
        .split(',')
        .next()
        .and_then(|c| c.parse::<u32>().ok())?;

    let ssid = ssid.trim();
    Some(NetworkRecord {
        ssid: if ssid.is_empty() {
            "(Hidden)".to_string()
        } else {
            ssid.to_string()
        },
        bssid: columns[0].to_string(),
        rssi,
        channel,
        security: if columns.len() > 4 {
            columns[4..].join(" ")
        } else {
            "Open".to_string()
        },
    })
}

/// Sort networks strongest first. Equal signals keep their order.
pub fn sort_by_signal(networks: &mut [NetworkRecord]) {
    networks.sort_by(|a, b| b.rssi.cmp(&a.rssi));
}

/// The `n` strongest networks, strongest first.
pub fn strongest(networks: &[NetworkRecord], n: usize) -> Vec<NetworkRecord> {
    let mut sorted = networks.to_vec();
    sort_by_signal(&mut sorted);
    sorted.truncate(n);
    sorted
}

/// Extract the SSID from `networksetup -getairportnetwork` output.
///
/// Returns `None` when not associated or the name is empty.
pub fn parse_current_network(stdout: &str) -> Option<String> {
    if !stdout.contains(CURRENT_NETWORK_MARKER) {
        return None;
    }
    stdout
        .split_once(':')
        .map(|(_, name)| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Interpret `networksetup -getairportpower` output.
pub fn parse_power_state(stdout: &str) -> bool {
    stdout.contains("On")
}

/// Interpret `blueutil -d` output.
pub fn parse_discoverable(stdout: &str) -> bool {
    stdout.trim() == "1"
}
