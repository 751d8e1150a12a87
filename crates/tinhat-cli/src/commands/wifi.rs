//! WiFi command implementations.

use std::path::PathBuf;

use anyhow::{Result, bail};
use tinhat_core::wifi::strongest;
use tinhat_core::{CommandRunner, Toolkit};

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, WifiStatus, format_networks_csv, format_networks_json, format_networks_text,
    format_wifi_status_csv, format_wifi_status_text,
};
use crate::style;
use crate::util::write_output;

pub async fn cmd_wifi_scan<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    limit: Option<usize>,
    format: OutputFormat,
    output: Option<&PathBuf>,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let spinner =
        style::scanning_spinner("WiFi networks", !quiet && matches!(format, OutputFormat::Text));

    let networks = toolkit.scan_wifi().await;

    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    let networks = match limit {
        Some(limit) => strongest(&networks, limit),
        None => networks,
    };

    let content = match format {
        OutputFormat::Json => format_networks_json(&networks, opts)?,
        OutputFormat::Text => format_networks_text(&networks, opts),
        OutputFormat::Csv => format_networks_csv(&networks, opts),
    };
    write_output(output, &content)
}

/// Read radio power and association.
pub async fn wifi_status<R: CommandRunner>(toolkit: &mut Toolkit<R>) -> WifiStatus {
    let power = toolkit.wifi_power().await;
    let network = if power {
        toolkit.current_network().await
    } else {
        None
    };
    WifiStatus {
        interface: toolkit.options().interface.clone(),
        power,
        network,
    }
}

pub async fn cmd_wifi_status<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let status = wifi_status(toolkit).await;
    let content = match format {
        OutputFormat::Json => opts.as_json(&status)?,
        OutputFormat::Text => format_wifi_status_text(&status, opts),
        OutputFormat::Csv => format_wifi_status_csv(&status, opts),
    };
    write_output(output, &content)
}

pub async fn cmd_wifi_power<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    on: bool,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    let state = if on { "on" } else { "off" };
    if !toolkit.set_wifi_power(on).await {
        bail!(
            "Failed to turn WiFi {} on {}",
            state,
            toolkit.options().interface
        );
    }
    if !quiet {
        println!(
            "{}",
            style::format_success(&format!("WiFi turned {}", state), no_color)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinhat_core::{CommandSpec, MockRunner, commands::DEFAULT_AIRPORT_PATH};

    fn scan_output() -> String {
        let row = |ssid: &str, rest: &str| format!("{:>32} {}\n", ssid, rest);
        format!(
            "{}{}{}",
            row("SSID", "BSSID             RSSI CHANNEL HT CC SECURITY"),
            row("Weak", "aa:bb:cc:dd:ee:01 -85  11      Y  US WPA2(PSK/AES/AES)"),
            row("Strong", "aa:bb:cc:dd:ee:02 -40  36      Y  US WPA2(PSK/AES/AES)"),
        )
    }

    #[tokio::test]
    async fn test_wifi_status_off_skips_network_lookup() {
        let runner = MockRunner::builder()
            .success(CommandSpec::wifi_power_state("en0"), "Wi-Fi Power (en0): Off\n")
            .build();
        let mut toolkit = Toolkit::new(runner);

        let status = wifi_status(&mut toolkit).await;
        assert!(!status.power);
        assert_eq!(status.network, None);
        assert_eq!(toolkit.runner().invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_wifi_status_associated() {
        let runner = MockRunner::builder()
            .success(CommandSpec::wifi_power_state("en0"), "Wi-Fi Power (en0): On\n")
            .success(
                CommandSpec::current_network("en0"),
                "Current Wi-Fi Network: HomeNet\n",
            )
            .build();
        let mut toolkit = Toolkit::new(runner);

        let status = wifi_status(&mut toolkit).await;
        assert_eq!(
            status,
            WifiStatus {
                interface: "en0".to_string(),
                power: true,
                network: Some("HomeNet".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_cmd_wifi_scan_limit_keeps_strongest() {
        let runner = MockRunner::builder()
            .success(CommandSpec::wifi_scan(DEFAULT_AIRPORT_PATH), &scan_output())
            .build();
        let mut toolkit = Toolkit::new(runner);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wifi.csv");
        let opts = FormatOptions::default().with_no_header(true);

        cmd_wifi_scan(&mut toolkit, Some(1), OutputFormat::Csv, Some(&path), true, &opts)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("Strong,"));
    }

    #[tokio::test]
    async fn test_cmd_wifi_power_failure_is_error() {
        let runner = MockRunner::builder()
            .failure(CommandSpec::set_wifi_power("en0", true), 1, "denied")
            .build();
        let mut toolkit = Toolkit::new(runner);

        let err = cmd_wifi_power(&mut toolkit, true, true, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to turn WiFi on"));
    }

    #[tokio::test]
    async fn test_cmd_wifi_power_success() {
        let runner = MockRunner::builder()
            .success(CommandSpec::set_wifi_power("en0", false), "")
            .build();
        let mut toolkit = Toolkit::new(runner);

        assert!(cmd_wifi_power(&mut toolkit, false, true, true).await.is_ok());
    }
}
