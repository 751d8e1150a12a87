//! The scanning and control facade.
//!
//! [`Toolkit`] owns a [`CommandRunner`] and a [`TtlCache`] of scan results.
//! Read operations live in [`crate::scan`], state-changing operations in
//! [`crate::control`]. All methods take `&mut self`: one owner drives the
//! toolkit, so calls are serialized and cache invalidation is never racing
//! a scan.

use std::path::PathBuf;
use std::time::Duration;

use tinhat_types::{Inventory, NetworkRecord};

use crate::cache::TtlCache;
use crate::commands::{DEFAULT_AIRPORT_PATH, DEFAULT_INTERFACE};
use crate::error::{Error, Result};
use crate::runner::SystemRunner;
use crate::traits::CommandRunner;

/// How long a Bluetooth inventory stays fresh.
pub const DEFAULT_BLUETOOTH_TTL: Duration = Duration::from_secs(10);
/// How long a WiFi scan stays fresh.
pub const DEFAULT_WIFI_TTL: Duration = Duration::from_secs(15);
/// How long WiFi association and power state stay fresh.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(5);

/// Identity of a cached operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    BluetoothInventory,
    WifiNetworks,
    CurrentNetwork,
    WifiPower,
}

/// A cached operation result.
#[derive(Debug, Clone)]
pub(crate) enum Cached {
    Inventory(Inventory),
    Networks(Vec<NetworkRecord>),
    CurrentNetwork(Option<String>),
    Power(bool),
}

/// Options for a [`Toolkit`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tinhat_core::ToolkitOptions;
///
/// let options = ToolkitOptions::default()
///     .interface("en1")
///     .bluetooth_ttl(Duration::from_secs(30));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ToolkitOptions {
    /// WiFi interface passed to `networksetup`.
    pub interface: String,
    /// Location of the `airport` scanning utility.
    pub airport_path: PathBuf,
    pub bluetooth_ttl: Duration,
    pub wifi_ttl: Duration,
    /// TTL for current network and power state.
    pub status_ttl: Duration,
}

impl Default for ToolkitOptions {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            airport_path: PathBuf::from(DEFAULT_AIRPORT_PATH),
            bluetooth_ttl: DEFAULT_BLUETOOTH_TTL,
            wifi_ttl: DEFAULT_WIFI_TTL,
            status_ttl: DEFAULT_STATUS_TTL,
        }
    }
}

impl ToolkitOptions {
    /// Set the WiFi interface.
    #[must_use]
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = interface.into();
        self
    }

    /// Set the airport utility path.
    #[must_use]
    pub fn airport_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.airport_path = path.into();
        self
    }

    /// Set the Bluetooth inventory TTL.
    #[must_use]
    pub fn bluetooth_ttl(mut self, ttl: Duration) -> Self {
        self.bluetooth_ttl = ttl;
        self
    }

    /// Set the WiFi scan TTL.
    #[must_use]
    pub fn wifi_ttl(mut self, ttl: Duration) -> Self {
        self.wifi_ttl = ttl;
        self
    }

    /// Set the WiFi status TTL.
    #[must_use]
    pub fn status_ttl(mut self, ttl: Duration) -> Self {
        self.status_ttl = ttl;
        self
    }

    /// Check the options.
    ///
    /// The interface name must be a non-empty run of ASCII letters and digits
    /// since it is passed straight to `networksetup`.
    pub fn validate(&self) -> Result<()> {
        if self.interface.is_empty() {
            return Err(Error::invalid_config("interface must not be empty"));
        }
        if !self.interface.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::invalid_config(format!(
                "interface {:?} must contain only letters and digits",
                self.interface
            )));
        }
        if self.airport_path.as_os_str().is_empty() {
            return Err(Error::invalid_config("airport path must not be empty"));
        }
        Ok(())
    }
}

/// Bluetooth and WiFi inventory with caching and device control.
///
/// # Example
///
/// ```
/// use tinhat_core::{CommandSpec, MockRunner, Toolkit};
///
/// #[tokio::main]
/// async fn main() {
///     let runner = MockRunner::new();
///     runner.on_success(
///         &CommandSpec::bluetooth_inventory(),
///         "Connected:\n  Keys:\n    Address: AA:BB:CC:DD:EE:FF\n",
///     );
///
///     let mut toolkit = Toolkit::new(runner);
///     let inventory = toolkit.scan_bluetooth().await;
///     assert_eq!(inventory.connected.len(), 1);
/// }
/// ```
#[derive(Debug)]
pub struct Toolkit<R> {
    pub(crate) runner: R,
    pub(crate) options: ToolkitOptions,
    pub(crate) cache: TtlCache<CacheKey, Cached>,
}

impl Toolkit<SystemRunner> {
    /// A toolkit that runs the real host utilities with default options.
    pub fn system() -> Self {
        Self::new(SystemRunner)
    }
}

impl<R: CommandRunner> Toolkit<R> {
    /// Create a toolkit with default options.
    pub fn new(runner: R) -> Self {
        Self::build(runner, ToolkitOptions::default())
    }

    /// Create a toolkit with custom options.
    pub fn with_options(runner: R, options: ToolkitOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(runner, options))
    }

    fn build(runner: R, options: ToolkitOptions) -> Self {
        let cache = TtlCache::new(options.bluetooth_ttl)
            .with_ttl(CacheKey::BluetoothInventory, options.bluetooth_ttl)
            .with_ttl(CacheKey::WifiNetworks, options.wifi_ttl)
            .with_ttl(CacheKey::CurrentNetwork, options.status_ttl)
            .with_ttl(CacheKey::WifiPower, options.status_ttl);
        Self {
            runner,
            options,
            cache,
        }
    }

    /// The underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn options(&self) -> &ToolkitOptions {
        &self.options
    }

    /// Drop one cached result so the next read re-runs its command.
    pub fn invalidate(&mut self, key: CacheKey) {
        if self.cache.invalidate(&key) {
            tracing::debug!("Invalidated cached {:?}", key);
        }
    }

    /// Drop every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Returns `true` if a fresh result is cached for `key`.
    pub fn is_cached(&self, key: CacheKey) -> bool {
        self.cache.get(&key).is_some()
    }
}
