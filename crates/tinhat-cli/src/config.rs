//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tinhat_core::ToolkitOptions;

use crate::cli::{ConfigKey, MAX_INTERVAL, MIN_INTERVAL, OutputFormat, parse_bool_arg};

/// Default watch interval in seconds
pub const DEFAULT_INTERVAL: u64 = 5;
/// Default headset alert threshold in minutes
pub const DEFAULT_HEADSET_ALERT_MINUTES: u64 = 30;
/// Valid headset alert range in minutes
pub const HEADSET_ALERT_RANGE: std::ops::RangeInclusive<u64> = 15..=120;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// WiFi interface passed to networksetup
    #[serde(default)]
    pub interface: Option<String>,

    /// Location of the airport scanning utility
    #[serde(default)]
    pub airport_path: Option<PathBuf>,

    /// Default output format
    #[serde(default)]
    pub format: Option<String>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Default watch interval in seconds
    #[serde(default)]
    pub interval: Option<u64>,

    /// Minutes of continuous headset use before watch raises an alert
    #[serde(default)]
    pub headset_alert_minutes: Option<u64>,

    /// Include WiFi networks in watch and report output
    #[serde(default = "default_true")]
    pub show_wifi: bool,

    /// Cache lifetimes
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Per-operation cache lifetimes in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub bluetooth_ttl: Option<u64>,
    #[serde(default)]
    pub wifi_ttl: Option<u64>,
    /// Current network and radio power
    #[serde(default)]
    pub status_ttl: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: None,
            airport_path: None,
            format: None,
            no_color: false,
            interval: None,
            headset_alert_minutes: None,
            show_wifi: true,
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tinhat")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a file. Missing or unreadable files yield the default.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Read one key as display text. `None` means unset.
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Interface => self.interface.clone(),
            ConfigKey::AirportPath => self.airport_path.as_ref().map(|p| p.display().to_string()),
            ConfigKey::Format => self.format.clone(),
            ConfigKey::NoColor => Some(self.no_color.to_string()),
            ConfigKey::Interval => self.interval.map(|v| v.to_string()),
            ConfigKey::HeadsetAlertMinutes => self.headset_alert_minutes.map(|v| v.to_string()),
            ConfigKey::ShowWifi => Some(self.show_wifi.to_string()),
            ConfigKey::BluetoothTtl => self.cache.bluetooth_ttl.map(|v| v.to_string()),
            ConfigKey::WifiTtl => self.cache.wifi_ttl.map(|v| v.to_string()),
            ConfigKey::StatusTtl => self.cache.status_ttl.map(|v| v.to_string()),
        }
    }

    /// Set one key from text, validating the value.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::Interface => {
                if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
                    bail!("Invalid interface '{}'. Expected a name like en0", value);
                }
                self.interface = Some(value.to_string());
            }
            ConfigKey::AirportPath => {
                if value.is_empty() {
                    bail!("airport_path cannot be empty");
                }
                self.airport_path = Some(PathBuf::from(value));
            }
            ConfigKey::Format => {
                if OutputFormat::from_config(value).is_none() {
                    bail!("Invalid format '{}'. Valid formats: text, json, csv", value);
                }
                self.format = Some(value.to_lowercase());
            }
            ConfigKey::NoColor => self.no_color = parse_bool_arg(value).map_err(anyhow::Error::msg)?,
            ConfigKey::ShowWifi => self.show_wifi = parse_bool_arg(value).map_err(anyhow::Error::msg)?,
            ConfigKey::Interval => {
                let secs = parse_number(key, value)?;
                if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&secs) {
                    bail!(
                        "Invalid interval {}. Valid range: {}-{} seconds",
                        secs,
                        MIN_INTERVAL,
                        MAX_INTERVAL
                    );
                }
                self.interval = Some(secs);
            }
            ConfigKey::HeadsetAlertMinutes => {
                let minutes = parse_number(key, value)?;
                if !HEADSET_ALERT_RANGE.contains(&minutes) {
                    bail!(
                        "Invalid headset alert {}. Valid range: {}-{} minutes",
                        minutes,
                        HEADSET_ALERT_RANGE.start(),
                        HEADSET_ALERT_RANGE.end()
                    );
                }
                self.headset_alert_minutes = Some(minutes);
            }
            ConfigKey::BluetoothTtl => self.cache.bluetooth_ttl = Some(parse_number(key, value)?),
            ConfigKey::WifiTtl => self.cache.wifi_ttl = Some(parse_number(key, value)?),
            ConfigKey::StatusTtl => self.cache.status_ttl = Some(parse_number(key, value)?),
        }
        Ok(())
    }

    /// Reset one key to its default.
    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Interface => self.interface = None,
            ConfigKey::AirportPath => self.airport_path = None,
            ConfigKey::Format => self.format = None,
            ConfigKey::NoColor => self.no_color = false,
            ConfigKey::Interval => self.interval = None,
            ConfigKey::HeadsetAlertMinutes => self.headset_alert_minutes = None,
            ConfigKey::ShowWifi => self.show_wifi = true,
            ConfigKey::BluetoothTtl => self.cache.bluetooth_ttl = None,
            ConfigKey::WifiTtl => self.cache.wifi_ttl = None,
            ConfigKey::StatusTtl => self.cache.status_ttl = None,
        }
    }

    /// Build toolkit options, with `interface` taking precedence over the file.
    pub fn toolkit_options(&self, interface: Option<&str>) -> ToolkitOptions {
        let mut options = ToolkitOptions::default();
        if let Some(iface) = interface.or(self.interface.as_deref()) {
            options = options.interface(iface);
        }
        if let Some(path) = &self.airport_path {
            options = options.airport_path(path.clone());
        }
        if let Some(secs) = self.cache.bluetooth_ttl {
            options = options.bluetooth_ttl(Duration::from_secs(secs));
        }
        if let Some(secs) = self.cache.wifi_ttl {
            options = options.wifi_ttl(Duration::from_secs(secs));
        }
        if let Some(secs) = self.cache.status_ttl {
            options = options.status_ttl(Duration::from_secs(secs));
        }
        options
    }

    /// Headset alert threshold, clamped to the valid range.
    pub fn headset_alert(&self) -> Duration {
        let minutes = self
            .headset_alert_minutes
            .unwrap_or(DEFAULT_HEADSET_ALERT_MINUTES)
            .clamp(*HEADSET_ALERT_RANGE.start(), *HEADSET_ALERT_RANGE.end());
        Duration::from_secs(minutes * 60)
    }
}

fn parse_number(key: ConfigKey, value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("Invalid value for {}: '{}' is not a number", key.name(), value))
}

/// Resolve the output format: `--json` wins, then the explicit flag, then config.
pub fn resolve_format(json: bool, explicit: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if let Some(format) = explicit {
        format
    } else {
        config
            .format
            .as_deref()
            .and_then(OutputFormat::from_config)
            .unwrap_or_default()
    }
}

/// Resolve the watch interval: explicit value, then config, then the default.
/// Values from the file are clamped to the valid range.
pub fn resolve_interval(explicit: Option<u64>, config: &Config) -> u64 {
    explicit
        .or(config.interval)
        .unwrap_or(DEFAULT_INTERVAL)
        .clamp(MIN_INTERVAL, MAX_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.interface, None);
        assert!(config.show_wifi);
        assert!(!config.no_color);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set(ConfigKey::Interface, "en1").unwrap();
        config.set(ConfigKey::Interval, "10").unwrap();
        config.set(ConfigKey::BluetoothTtl, "20").unwrap();
        config.set(ConfigKey::ShowWifi, "no").unwrap();
        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("interface = \"en1\""));
        assert!(content.contains("[cache]"));

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "interval = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set(ConfigKey::Interface, "en0; rm").is_err());
        assert!(config.set(ConfigKey::Format, "xml").is_err());
        assert!(config.set(ConfigKey::Interval, "1").is_err());
        assert!(config.set(ConfigKey::HeadsetAlertMinutes, "5").is_err());
        assert!(config.set(ConfigKey::WifiTtl, "-3").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_get_set_unset() {
        let mut config = Config::default();
        assert_eq!(config.get(ConfigKey::Format), None);

        config.set(ConfigKey::Format, "JSON").unwrap();
        assert_eq!(config.get(ConfigKey::Format).as_deref(), Some("json"));

        config.set(ConfigKey::NoColor, "true").unwrap();
        assert_eq!(config.get(ConfigKey::NoColor).as_deref(), Some("true"));

        config.unset(ConfigKey::Format);
        config.unset(ConfigKey::NoColor);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toolkit_options_prefers_argument() {
        let config = Config {
            interface: Some("en1".to_string()),
            cache: CacheConfig {
                wifi_ttl: Some(60),
                ..Default::default()
            },
            ..Default::default()
        };

        let options = config.toolkit_options(None);
        assert_eq!(options.interface, "en1");
        assert_eq!(options.wifi_ttl, Duration::from_secs(60));

        let options = config.toolkit_options(Some("en7"));
        assert_eq!(options.interface, "en7");
    }

    #[test]
    fn test_toolkit_options_defaults() {
        let options = Config::default().toolkit_options(None);
        assert_eq!(options.interface, ToolkitOptions::default().interface);
        assert_eq!(options.airport_path, ToolkitOptions::default().airport_path);
    }

    #[test]
    fn test_resolve_format() {
        let config = Config {
            format: Some("csv".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(true, Some(OutputFormat::Text), &config), OutputFormat::Json);
        assert_eq!(resolve_format(false, Some(OutputFormat::Text), &config), OutputFormat::Text);
        assert_eq!(resolve_format(false, None, &config), OutputFormat::Csv);
        assert_eq!(resolve_format(false, None, &Config::default()), OutputFormat::Text);
    }

    #[test]
    fn test_resolve_interval() {
        let config = Config {
            interval: Some(90),
            ..Default::default()
        };
        assert_eq!(resolve_interval(Some(3), &config), 3);
        assert_eq!(resolve_interval(None, &config), MAX_INTERVAL);
        assert_eq!(resolve_interval(None, &Config::default()), DEFAULT_INTERVAL);
    }

    #[test]
    fn test_headset_alert_clamped() {
        assert_eq!(Config::default().headset_alert(), Duration::from_secs(30 * 60));

        let config = Config {
            headset_alert_minutes: Some(500),
            ..Default::default()
        };
        assert_eq!(config.headset_alert(), Duration::from_secs(120 * 60));
    }
}
