//! Inventory and status reads.
//!
//! Each read first consults the toolkit cache. On a miss it runs one
//! command, parses the output and caches the result. Failed runs are not
//! cached, so the next call tries again.
//!
//! The plain methods never fail. They log the error and return the
//! documented fallback; `try_*` variants return the error instead.

use tinhat_types::{Inventory, NetworkRecord};
use tracing::{debug, error, info, warn};

use crate::commands::CommandSpec;
use crate::error::{Error, Result};
use crate::inventory::parse_inventory;
use crate::toolkit::{CacheKey, Cached, Toolkit};
use crate::traits::CommandRunner;
use crate::wifi::{
    parse_current_network, parse_discoverable, parse_network_scan, parse_power_state,
    sort_by_signal,
};

/// Log a failed read at a level matching its cause.
fn log_failure(what: &str, err: &Error) {
    match err {
        Error::Timeout { .. } => error!("{} timed out: {}", what, err),
        Error::CommandUnavailable { .. } => warn!("{} unavailable: {}", what, err),
        _ => warn!("{} failed: {}", what, err),
    }
}

impl<R: CommandRunner> Toolkit<R> {
    /// Scan paired Bluetooth devices, returning an error on failure.
    pub async fn try_scan_bluetooth(&mut self) -> Result<Inventory> {
        if let Some(Cached::Inventory(inventory)) = self.cache.get(&CacheKey::BluetoothInventory) {
            debug!("Using cached Bluetooth inventory");
            return Ok(inventory.clone());
        }

        let output = self
            .runner
            .run_checked(&CommandSpec::bluetooth_inventory())
            .await?;
        let inventory = parse_inventory(&output.stdout);
        info!(
            "Bluetooth scan: {} connected, {} nearby",
            inventory.connected.len(),
            inventory.nearby.len()
        );

        self.cache
            .insert(CacheKey::BluetoothInventory, Cached::Inventory(inventory.clone()));
        Ok(inventory)
    }

    /// Scan paired Bluetooth devices.
    ///
    /// Returns an empty inventory when the inventory utility is missing,
    /// fails or times out.
    pub async fn scan_bluetooth(&mut self) -> Inventory {
        match self.try_scan_bluetooth().await {
            Ok(inventory) => inventory,
            Err(e) => {
                log_failure("Bluetooth scan", &e);
                Inventory::default()
            }
        }
    }

    /// Scan visible WiFi networks, strongest first, returning an error on failure.
    pub async fn try_scan_wifi(&mut self) -> Result<Vec<NetworkRecord>> {
        if let Some(Cached::Networks(networks)) = self.cache.get(&CacheKey::WifiNetworks) {
            debug!("Using cached WiFi scan");
            return Ok(networks.clone());
        }

        let airport = self.options.airport_path.to_string_lossy().into_owned();
        let output = self.runner.run_checked(&CommandSpec::wifi_scan(&airport)).await?;
        let mut networks = parse_network_scan(&output.stdout);
        sort_by_signal(&mut networks);
        info!("WiFi scan: {} networks", networks.len());

        self.cache
            .insert(CacheKey::WifiNetworks, Cached::Networks(networks.clone()));
        Ok(networks)
    }

    /// Scan visible WiFi networks, strongest first.
    ///
    /// Returns an empty list on failure. A missing airport utility is
    /// expected on recent macOS releases and only logged at debug level.
    pub async fn scan_wifi(&mut self) -> Vec<NetworkRecord> {
        match self.try_scan_wifi().await {
            Ok(networks) => networks,
            Err(e) if e.is_unavailable() => {
                debug!("Airport utility not found: {}", e);
                Vec::new()
            }
            Err(e) => {
                log_failure("WiFi scan", &e);
                Vec::new()
            }
        }
    }

    /// SSID of the associated network, if any.
    pub async fn current_network(&mut self) -> Option<String> {
        if let Some(Cached::CurrentNetwork(ssid)) = self.cache.get(&CacheKey::CurrentNetwork) {
            return ssid.clone();
        }

        let spec = CommandSpec::current_network(&self.options.interface);
        match self.runner.run(&spec).await {
            Ok(output) => {
                let ssid = parse_current_network(&output.stdout);
                self.cache
                    .insert(CacheKey::CurrentNetwork, Cached::CurrentNetwork(ssid.clone()));
                ssid
            }
            Err(e) => {
                debug!("Could not get current WiFi network: {}", e);
                None
            }
        }
    }

    /// Whether WiFi is powered on. Assumes on when the state can't be read.
    pub async fn wifi_power(&mut self) -> bool {
        if let Some(Cached::Power(on)) = self.cache.get(&CacheKey::WifiPower) {
            return *on;
        }

        let spec = CommandSpec::wifi_power_state(&self.options.interface);
        match self.runner.run(&spec).await {
            Ok(output) => {
                let on = parse_power_state(&output.stdout);
                self.cache.insert(CacheKey::WifiPower, Cached::Power(on));
                on
            }
            Err(e) => {
                debug!("Could not read WiFi power state: {}", e);
                true
            }
        }
    }

    /// Whether this host is discoverable over Bluetooth.
    ///
    /// Not cached. Assumes discoverable when the state can't be read.
    pub async fn discoverable(&mut self) -> bool {
        match self.runner.run_checked(&CommandSpec::discoverable_state()).await {
            Ok(output) => parse_discoverable(&output.stdout),
            Err(e) => {
                debug!("Could not read discoverable state: {}", e);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::mock::MockRunner;

    // "Services:" closes the Keys block while the section is still Connected
    const INVENTORY: &str = "Connected:\n  Keys:\n    Address: AA:BB:CC:DD:EE:01\n    Minor Type: Keyboard\n    Services:\nNot Connected:\n  TV:\n    Address: AA:BB:CC:DD:EE:02\n";

    #[tokio::test]
    async fn test_scan_bluetooth_parses_output() {
        let runner = MockRunner::builder()
            .success(CommandSpec::bluetooth_inventory(), INVENTORY)
            .build();
        let mut toolkit = Toolkit::new(runner);

        let inv = toolkit.scan_bluetooth().await;
        assert_eq!(inv.connected.len(), 1);
        assert_eq!(inv.nearby.len(), 1);
        assert_eq!(inv.connected[0].device_type, "Keyboard");
        assert_eq!(inv.nearby[0].name, "TV");
    }

    #[tokio::test]
    async fn test_scan_bluetooth_files_open_block_under_later_section() {
        // Keys is still open when the marker arrives, so it lands in nearby
        let text = "Connected:\n  Keys:\n    Address: AA:BB:CC:DD:EE:01\nNot Connected:\n  TV:\n    Address: AA:BB:CC:DD:EE:02\n";
        let runner = MockRunner::builder()
            .success(CommandSpec::bluetooth_inventory(), text)
            .build();
        let mut toolkit = Toolkit::new(runner);

        let inv = toolkit.scan_bluetooth().await;
        assert!(inv.connected.is_empty());
        assert_eq!(inv.nearby.len(), 2);
        assert!(inv.nearby.iter().all(|d| !d.connected));
    }

    #[tokio::test]
    async fn test_scan_bluetooth_degrades_to_empty() {
        for runner in [
            MockRunner::builder()
                .failure(CommandSpec::bluetooth_inventory(), 1, "boom")
                .build(),
            MockRunner::builder()
                .timeout(CommandSpec::bluetooth_inventory())
                .build(),
            MockRunner::new(),
        ] {
            let mut toolkit = Toolkit::new(runner);
            assert!(toolkit.scan_bluetooth().await.is_empty());
            assert!(!toolkit.is_cached(CacheKey::BluetoothInventory));
        }
    }

    #[tokio::test]
    async fn test_try_scan_surfaces_error() {
        let runner = MockRunner::builder()
            .failure(CommandSpec::bluetooth_inventory(), 1, "boom")
            .build();
        let mut toolkit = Toolkit::new(runner);
        assert!(matches!(
            toolkit.try_scan_bluetooth().await,
            Err(Error::CommandFailed { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_bluetooth_cached_within_ttl() {
        let runner = MockRunner::builder()
            .success(CommandSpec::bluetooth_inventory(), INVENTORY)
            .build();
        let mut toolkit = Toolkit::new(runner);

        toolkit.scan_bluetooth().await;
        toolkit.scan_bluetooth().await;
        assert_eq!(toolkit.runner().invocation_count(), 1);

        tokio::time::advance(Duration::from_secs(11)).await;
        toolkit.scan_bluetooth().await;
        assert_eq!(toolkit.runner().invocation_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_scan_is_retried() {
        let spec = CommandSpec::bluetooth_inventory();
        let runner = MockRunner::new();
        runner.on_failure(&spec, 1, "busy");
        runner.on_success(&spec, INVENTORY);
        let mut toolkit = Toolkit::new(runner);

        assert!(toolkit.scan_bluetooth().await.is_empty());
        assert_eq!(toolkit.scan_bluetooth().await.len(), 2);
    }

    fn airport_output() -> String {
        [
            "                            SSID BSSID             RSSI CHANNEL HT CC SECURITY (auth/unicast/group)",
            "                            Weak aa:bb:cc:dd:ee:01 -85  1       Y  US WPA2(PSK/AES/AES)",
            "                          Strong aa:bb:cc:dd:ee:02 -42  6       Y  US WPA2(PSK/AES/AES)",
        ]
        .join("\n")
    }

    #[tokio::test]
    async fn test_scan_wifi_sorted() {
        let options = crate::ToolkitOptions::default();
        let spec = CommandSpec::wifi_scan(&options.airport_path.to_string_lossy());
        let runner = MockRunner::builder().success(spec, &airport_output()).build();
        let mut toolkit = Toolkit::new(runner);

        let nets = toolkit.scan_wifi().await;
        assert_eq!(nets.len(), 2);
        assert_eq!(nets[0].ssid, "Strong");
        assert_eq!(nets[1].ssid, "Weak");
    }

    #[tokio::test]
    async fn test_scan_wifi_missing_utility() {
        let mut toolkit = Toolkit::new(MockRunner::new());
        assert!(toolkit.scan_wifi().await.is_empty());
    }

    #[tokio::test]
    async fn test_current_network_and_power() {
        let runner = MockRunner::builder()
            .success(CommandSpec::current_network("en0"), "Current Wi-Fi Network: HomeNet\n")
            .success(CommandSpec::wifi_power_state("en0"), "Wi-Fi Power (en0): Off\n")
            .build();
        let mut toolkit = Toolkit::new(runner);

        assert_eq!(toolkit.current_network().await.as_deref(), Some("HomeNet"));
        assert!(!toolkit.wifi_power().await);

        // Served from cache.
        toolkit.current_network().await;
        toolkit.wifi_power().await;
        assert_eq!(toolkit.runner().invocation_count(), 2);
    }

    #[tokio::test]
    async fn test_status_fallbacks() {
        let mut toolkit = Toolkit::new(MockRunner::new());
        assert_eq!(toolkit.current_network().await, None);
        assert!(toolkit.wifi_power().await);
        assert!(toolkit.discoverable().await);
    }

    #[tokio::test]
    async fn test_discoverable_not_cached() {
        let spec = CommandSpec::discoverable_state();
        let runner = MockRunner::new();
        runner.on_success(&spec, "0\n");
        runner.on_success(&spec, "1\n");
        let mut toolkit = Toolkit::new(runner);

        assert!(!toolkit.discoverable().await);
        assert!(toolkit.discoverable().await);
    }

    #[tokio::test]
    async fn test_interface_option_used() {
        let options = crate::ToolkitOptions::default().interface("en1");
        let runner = MockRunner::builder()
            .success(CommandSpec::current_network("en1"), "Current Wi-Fi Network: Lab\n")
            .build();
        let mut toolkit = Toolkit::with_options(runner, options).unwrap();
        assert_eq!(toolkit.current_network().await.as_deref(), Some("Lab"));
    }
}
