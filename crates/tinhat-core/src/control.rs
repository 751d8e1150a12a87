//! State-changing operations: connect, disconnect, forget, radio toggles.
//!
//! Every device action follows the same steps:
//!
//! 1. Validate the address. Invalid input is logged and rejected without
//!    starting any process.
//! 2. Run `blueutil` with the action flag and the address as separate
//!    arguments, under the action's timeout.
//! 3. On a non-zero exit, a timeout or a spawn failure, log and report
//!    failure.
//! 4. On success, drop the cached Bluetooth inventory before reporting
//!    success, so the next scan reflects the change.

use tracing::{error, info, warn};

use crate::commands::{CommandSpec, DeviceAction};
use crate::error::{Error, Result};
use crate::toolkit::{CacheKey, Toolkit};
use crate::traits::CommandRunner;
use crate::validation::validate_address;

impl<R: CommandRunner> Toolkit<R> {
    /// Perform a device action, returning the error on failure.
    pub async fn try_control(&mut self, action: DeviceAction, address: &str) -> Result<()> {
        let address = validate_address(address)?;
        let spec = CommandSpec::device_action(action, &address);

        self.runner.run_checked(&spec).await?;
        self.invalidate(CacheKey::BluetoothInventory);
        info!("{} {}: ok", action, address);
        Ok(())
    }

    /// Perform a device action. Returns `true` on success.
    pub async fn control(&mut self, action: DeviceAction, address: &str) -> bool {
        match self.try_control(action, address).await {
            Ok(()) => true,
            Err(Error::InvalidAddress(e)) => {
                warn!("Refusing to {}: {}", action, e);
                false
            }
            Err(e @ Error::Timeout { .. }) => {
                error!("Failed to {} {}: {}", action, address, e);
                false
            }
            Err(e) => {
                warn!("Failed to {} {}: {}", action, address, e);
                false
            }
        }
    }

    /// Connect a paired device.
    pub async fn connect(&mut self, address: &str) -> bool {
        self.control(DeviceAction::Connect, address).await
    }

    /// Disconnect a connected device.
    pub async fn disconnect(&mut self, address: &str) -> bool {
        self.control(DeviceAction::Disconnect, address).await
    }

    /// Remove a device pairing.
    pub async fn forget(&mut self, address: &str) -> bool {
        self.control(DeviceAction::Forget, address).await
    }

    /// Turn WiFi on or off. Success drops the cached power state.
    pub async fn set_wifi_power(&mut self, on: bool) -> bool {
        let spec = CommandSpec::set_wifi_power(&self.options.interface, on);
        match self.runner.run_checked(&spec).await {
            Ok(_) => {
                self.invalidate(CacheKey::WifiPower);
                info!("WiFi power {}", if on { "on" } else { "off" });
                true
            }
            Err(e) => {
                warn!("Failed to toggle WiFi: {}", e);
                false
            }
        }
    }

    /// Make this host discoverable over Bluetooth, or hide it.
    pub async fn set_discoverable(&mut self, enabled: bool) -> bool {
        match self
            .runner
            .run_checked(&CommandSpec::set_discoverable(enabled))
            .await
        {
            Ok(_) => {
                info!("Bluetooth discoverable {}", if enabled { "on" } else { "off" });
                true
            }
            Err(e) => {
                warn!("Failed to set discoverable: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRunner;

    const ADDR: &str = "AA:BB:CC:DD:EE:FF";

    fn action_spec(action: DeviceAction) -> CommandSpec {
        CommandSpec::device_action(action, &ADDR.parse().unwrap())
    }

    #[tokio::test]
    async fn test_invalid_address_spawns_nothing() {
        let mut toolkit = Toolkit::new(MockRunner::new());
        assert!(!toolkit.connect("bad-address").await);
        assert!(!toolkit.disconnect("AA:BB:CC:DD:EE").await);
        assert!(!toolkit.forget("AA:BB:CC:DD:EE:FF; ls").await);
        assert_eq!(toolkit.runner().invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_each_action_runs_its_command() {
        for action in DeviceAction::ALL {
            let runner = MockRunner::builder().success(action_spec(action), "").build();
            let mut toolkit = Toolkit::new(runner);

            assert!(toolkit.control(action, ADDR).await);
            let runs = toolkit.runner().invocations();
            assert_eq!(runs.len(), 1);
            assert_eq!(runs[0], action_spec(action));
            assert_eq!(runs[0].timeout, action.timeout());
        }
    }

    #[tokio::test]
    async fn test_failure_reports_false() {
        let runner = MockRunner::builder()
            .failure(action_spec(DeviceAction::Connect), 1, "Device not found")
            .timeout(action_spec(DeviceAction::Disconnect))
            .build();
        let mut toolkit = Toolkit::new(runner);

        assert!(!toolkit.connect(ADDR).await);
        assert!(!toolkit.disconnect(ADDR).await);
        // Not scripted: behaves like a missing blueutil.
        assert!(!toolkit.forget(ADDR).await);
    }

    #[tokio::test]
    async fn test_success_invalidates_inventory() {
        let inventory = "Connected:\nKeys:\nAddress: AA:BB:CC:DD:EE:FF\n";
        let runner = MockRunner::builder()
            .success(CommandSpec::bluetooth_inventory(), inventory)
            .success(action_spec(DeviceAction::Disconnect), "")
            .build();
        let mut toolkit = Toolkit::new(runner);

        toolkit.scan_bluetooth().await;
        assert!(toolkit.is_cached(CacheKey::BluetoothInventory));

        assert!(toolkit.disconnect(ADDR).await);
        assert!(!toolkit.is_cached(CacheKey::BluetoothInventory));

        toolkit.scan_bluetooth().await;
        assert_eq!(
            toolkit
                .runner()
                .count_for(&CommandSpec::bluetooth_inventory()),
            2
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_cache() {
        let runner = MockRunner::builder()
            .success(CommandSpec::bluetooth_inventory(), "Connected:\nK:\nAddress: AA:BB:CC:DD:EE:FF\n")
            .failure(action_spec(DeviceAction::Forget), 1, "nope")
            .build();
        let mut toolkit = Toolkit::new(runner);

        toolkit.scan_bluetooth().await;
        assert!(!toolkit.forget(ADDR).await);
        assert!(toolkit.is_cached(CacheKey::BluetoothInventory));
    }

    #[tokio::test]
    async fn test_try_control_errors() {
        let mut toolkit = Toolkit::new(MockRunner::new());
        assert!(matches!(
            toolkit.try_control(DeviceAction::Connect, "zz").await,
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            toolkit.try_control(DeviceAction::Connect, ADDR).await,
            Err(Error::CommandUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_wifi_power_invalidates_power() {
        let runner = MockRunner::builder()
            .success(CommandSpec::wifi_power_state("en0"), "Wi-Fi Power (en0): On\n")
            .success(CommandSpec::set_wifi_power("en0", false), "")
            .build();
        let mut toolkit = Toolkit::new(runner);

        assert!(toolkit.wifi_power().await);
        assert!(toolkit.is_cached(CacheKey::WifiPower));
        assert!(toolkit.set_wifi_power(false).await);
        assert!(!toolkit.is_cached(CacheKey::WifiPower));
    }

    #[tokio::test]
    async fn test_set_discoverable() {
        let runner = MockRunner::builder()
            .success(CommandSpec::set_discoverable(false), "")
            .build();
        let mut toolkit = Toolkit::new(runner);
        assert!(toolkit.set_discoverable(false).await);
        assert!(!toolkit.set_discoverable(true).await);
    }
}
