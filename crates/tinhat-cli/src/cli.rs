//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name as stored in the config file.
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Standard styling with colors
    Minimal,
    /// Rich styling with tables and full formatting (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// On/off argument for radio and visibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the configured format, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Parser)]
#[command(name = "tinhat")]
#[command(
    author,
    version,
    about = "Inspect and control Bluetooth devices and WiFi on macOS",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "TINHAT_STYLE"
    )]
    pub style: StyleMode,

    /// WiFi interface passed to networksetup (overrides config)
    #[arg(long, global = true, env = "TINHAT_INTERFACE")]
    pub interface: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected and nearby Bluetooth devices
    Scan {
        #[command(flatten)]
        output: OutputArgs,

        /// Only show connected devices
        #[arg(long, conflicts_with = "nearby")]
        connected: bool,

        /// Only show nearby (paired, not connected) devices
        #[arg(long, conflicts_with = "connected")]
        nearby: bool,
    },

    /// Inspect and control WiFi
    Wifi {
        #[command(subcommand)]
        action: WifiAction,
    },

    /// Connect a paired Bluetooth device
    Connect {
        /// Device address (AA:BB:CC:DD:EE:FF)
        address: String,
    },

    /// Disconnect a connected Bluetooth device
    Disconnect {
        /// Device address (AA:BB:CC:DD:EE:FF)
        address: String,
    },

    /// Remove a Bluetooth pairing
    Forget {
        /// Device address (AA:BB:CC:DD:EE:FF)
        address: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or change Bluetooth discoverability
    Discoverable {
        /// New state; omit to show the current one
        #[arg(value_enum)]
        state: Option<Toggle>,
    },

    /// Continuously monitor connected devices and exposure
    Watch {
        /// Polling interval in seconds (2-30)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<u64>,

        /// Number of polls before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Export devices, networks and exposure as JSON
    Report {
        /// Leave out the WiFi scan
        #[arg(long)]
        no_wifi: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check that the system utilities are installed and working
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// WiFi subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum WifiAction {
    /// List visible networks, strongest first
    Scan {
        #[command(flatten)]
        output: OutputArgs,

        /// Only show the strongest N networks
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show radio power and the associated network
    Status,

    /// Turn the WiFi radio on or off
    Power {
        #[arg(value_enum)]
        state: Toggle,
    },
}

/// Parse a polling interval in seconds.
pub fn parse_interval(s: &str) -> Result<u64, String> {
    let secs: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if (MIN_INTERVAL..=MAX_INTERVAL).contains(&secs) {
        Ok(secs)
    } else {
        Err(format!(
            "Invalid interval '{}'. Valid range: {}-{} seconds",
            secs, MIN_INTERVAL, MAX_INTERVAL
        ))
    }
}

/// Shortest allowed watch interval in seconds
pub const MIN_INTERVAL: u64 = 2;
/// Longest allowed watch interval in seconds
pub const MAX_INTERVAL: u64 = 30;

/// Parse boolean argument with flexible input
pub fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        )),
    }
}

/// Configuration keys, named as they appear in config.toml
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// WiFi interface for networksetup
    #[value(name = "interface")]
    Interface,
    /// Location of the airport utility
    #[value(name = "airport_path")]
    AirportPath,
    /// Default output format
    #[value(name = "format")]
    Format,
    /// Disable colored output
    #[value(name = "no_color")]
    NoColor,
    /// Default watch interval in seconds
    #[value(name = "interval")]
    Interval,
    /// Minutes of headset use before the watch alert
    #[value(name = "headset_alert_minutes")]
    HeadsetAlertMinutes,
    /// Include WiFi networks in watch and report
    #[value(name = "show_wifi")]
    ShowWifi,
    /// Seconds a Bluetooth inventory stays cached
    #[value(name = "cache.bluetooth_ttl")]
    BluetoothTtl,
    /// Seconds a WiFi scan stays cached
    #[value(name = "cache.wifi_ttl")]
    WifiTtl,
    /// Seconds WiFi status stays cached
    #[value(name = "cache.status_ttl")]
    StatusTtl,
}

impl ConfigKey {
    /// The key as written in config.toml.
    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Interface => "interface",
            ConfigKey::AirportPath => "airport_path",
            ConfigKey::Format => "format",
            ConfigKey::NoColor => "no_color",
            ConfigKey::Interval => "interval",
            ConfigKey::HeadsetAlertMinutes => "headset_alert_minutes",
            ConfigKey::ShowWifi => "show_wifi",
            ConfigKey::BluetoothTtl => "cache.bluetooth_ttl",
            ConfigKey::WifiTtl => "cache.wifi_ttl",
            ConfigKey::StatusTtl => "cache.status_ttl",
        }
    }
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
