//! Command-line interface for inspecting and controlling Bluetooth and WiFi
//! on macOS.
//!
//! The `tinhat` binary wraps the system utilities driven by [`tinhat_core`]:
//! `system_profiler` for the Bluetooth inventory, `blueutil` for device
//! control and discoverability, `networksetup` for WiFi power and
//! association, and the private `airport` utility for network scans.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | List connected and nearby Bluetooth devices |
//! | `wifi scan` | List visible networks, strongest first |
//! | `wifi status` | Show radio power and the associated network |
//! | `wifi power` | Turn the WiFi radio on or off |
//! | `connect` / `disconnect` | Control a paired device |
//! | `forget` | Remove a pairing (asks for confirmation) |
//! | `discoverable` | Show or change Bluetooth discoverability |
//! | `watch` | Poll devices and track exposure over time |
//! | `report` | Export devices, networks and exposure as JSON |
//! | `config` | Manage CLI configuration |
//! | `doctor` | Check the system utilities |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): tables with colored status
//! - **JSON**: `--json` or `--format json`; `--compact` disables pretty-printing
//! - **CSV**: `--format csv`; `--no-header` omits the header row
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/tinhat/config.toml` (or the
//! platform equivalent). Keys:
//!
//! - `interface`: WiFi interface (default `en0`)
//! - `airport_path`: Location of the airport utility
//! - `format`: Default output format
//! - `no_color`: Disable colored output
//! - `interval`: Default watch interval in seconds
//! - `headset_alert_minutes`: Headset alert threshold for `watch`
//! - `show_wifi`: Include WiFi in `watch` and `report`
//! - `cache.bluetooth_ttl`, `cache.wifi_ttl`, `cache.status_ttl`: Cache lifetimes in seconds
//!
//! # Environment Variables
//!
//! - `TINHAT_INTERFACE`: WiFi interface (overridden by `--interface`)
//! - `TINHAT_STYLE`: Visual style (`minimal`, `rich`, `plain`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! Show connected devices as JSON:
//! ```bash
//! tinhat scan --connected --json
//! ```
//!
//! Disconnect a device:
//! ```bash
//! tinhat disconnect AA:BB:CC:DD:EE:FF
//! ```
//!
//! Log exposure every 10 seconds to a CSV file:
//! ```bash
//! tinhat watch --interval 10 --format csv --output exposure.csv
//! ```

// The binary lives in main.rs; this crate only re-exports the libraries
pub use tinhat_core;
pub use tinhat_types;
