//! Command lines for the macOS utilities this crate drives.
//!
//! Every external call is described by a [`CommandSpec`]: a program, its
//! discrete arguments, and a hard timeout. Arguments are never joined into a
//! shell string, so user input such as an address cannot inject commands.

use std::fmt;
use std::time::Duration;

use tinhat_types::BluetoothAddress;

/// Bluetooth and system inventory utility.
pub const SYSTEM_PROFILER: &str = "system_profiler";

/// Data type argument selecting the Bluetooth report.
pub const BLUETOOTH_DATA_TYPE: &str = "SPBluetoothDataType";

/// Third-party Bluetooth control utility.
pub const BLUEUTIL: &str = "blueutil";

/// Network preference utility.
pub const NETWORKSETUP: &str = "networksetup";

/// Default location of the private airport scanning utility.
pub const DEFAULT_AIRPORT_PATH: &str = "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport";

/// Default WiFi interface.
pub const DEFAULT_INTERFACE: &str = "en0";

/// Timeout for the Bluetooth inventory.
pub const INVENTORY_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for a connect request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for a disconnect request.
pub const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for an unpair request.
pub const FORGET_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for a WiFi network scan.
pub const WIFI_SCAN_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for WiFi status queries.
pub const WIFI_STATUS_TIMEOUT: Duration = Duration::from_secs(2);
/// Timeout for toggling WiFi power.
pub const WIFI_POWER_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for discoverability queries and changes.
pub const DISCOVERABLE_TIMEOUT: Duration = Duration::from_secs(2);

/// A single invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or absolute path.
    pub program: String,
    /// Arguments, passed as-is.
    pub args: Vec<String>,
    /// Hard limit on the run time.
    pub timeout: Duration,
}

impl CommandSpec {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Short name of the program, without any directory.
    pub fn program_name(&self) -> &str {
        self.program
            .rsplit('/')
            .next()
            .unwrap_or(self.program.as_str())
    }

    /// `system_profiler SPBluetoothDataType`
    pub fn bluetooth_inventory() -> Self {
        Self::new(SYSTEM_PROFILER, INVENTORY_TIMEOUT).arg(BLUETOOTH_DATA_TYPE)
    }

    /// `blueutil --connect|--disconnect|--unpair <address>`
    pub fn device_action(action: DeviceAction, address: &BluetoothAddress) -> Self {
        Self::new(BLUEUTIL, action.timeout())
            .arg(action.flag())
            .arg(address.as_str())
    }

    /// `blueutil -d`
    pub fn discoverable_state() -> Self {
        Self::new(BLUEUTIL, DISCOVERABLE_TIMEOUT).arg("-d")
    }

    /// `blueutil -d 1|0`
    pub fn set_discoverable(enabled: bool) -> Self {
        Self::new(BLUEUTIL, DISCOVERABLE_TIMEOUT).args(["-d", if enabled { "1" } else { "0" }])
    }

    /// `<airport> -s`
    pub fn wifi_scan(airport_path: &str) -> Self {
        Self::new(airport_path, WIFI_SCAN_TIMEOUT).arg("-s")
    }

    /// `networksetup -getairportnetwork <interface>`
    pub fn current_network(interface: &str) -> Self {
        Self::new(NETWORKSETUP, WIFI_STATUS_TIMEOUT).args(["-getairportnetwork", interface])
    }

    /// `networksetup -getairportpower <interface>`
    pub fn wifi_power_state(interface: &str) -> Self {
        Self::new(NETWORKSETUP, WIFI_STATUS_TIMEOUT).args(["-getairportpower", interface])
    }

    /// `networksetup -setairportpower <interface> on|off`
    pub fn set_wifi_power(interface: &str, on: bool) -> Self {
        Self::new(NETWORKSETUP, WIFI_POWER_TIMEOUT).args([
            "-setairportpower",
            interface,
            if on { "on" } else { "off" },
        ])
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A state-changing request for one Bluetooth device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceAction {
    Connect,
    Disconnect,
    /// Remove the pairing.
    Forget,
}

impl DeviceAction {
    /// All actions, in display order.
    pub const ALL: [DeviceAction; 3] = [Self::Connect, Self::Disconnect, Self::Forget];

    /// Flag passed to `blueutil`.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Connect => "--connect",
            Self::Disconnect => "--disconnect",
            Self::Forget => "--unpair",
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            Self::Connect => CONNECT_TIMEOUT,
            Self::Disconnect => DISCONNECT_TIMEOUT,
            Self::Forget => FORGET_TIMEOUT,
        }
    }
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Disconnect => write!(f, "disconnect"),
            Self::Forget => write!(f, "forget"),
        }
    }
}
