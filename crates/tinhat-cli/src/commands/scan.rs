//! Scan command implementation.

use std::path::PathBuf;

use anyhow::Result;
use tinhat_core::{CommandRunner, Inventory, Toolkit};

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, format_inventory_csv, format_inventory_json, format_inventory_text,
};
use crate::style;
use crate::util::write_output;

/// Which inventory section to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceFilter {
    #[default]
    All,
    Connected,
    Nearby,
}

impl DeviceFilter {
    pub fn from_flags(connected: bool, nearby: bool) -> Self {
        match (connected, nearby) {
            (true, _) => DeviceFilter::Connected,
            (false, true) => DeviceFilter::Nearby,
            (false, false) => DeviceFilter::All,
        }
    }

    /// Drop the sections this filter hides.
    pub fn apply(self, mut inventory: Inventory) -> Inventory {
        match self {
            DeviceFilter::All => {}
            DeviceFilter::Connected => inventory.nearby.clear(),
            DeviceFilter::Nearby => inventory.connected.clear(),
        }
        inventory
    }
}

/// Render an inventory in the requested format.
pub fn render_inventory(
    inventory: &Inventory,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format_inventory_json(inventory, opts)?,
        OutputFormat::Text => format_inventory_text(inventory, opts),
        OutputFormat::Csv => format_inventory_csv(inventory, opts),
    })
}

pub async fn cmd_scan<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    filter: DeviceFilter,
    format: OutputFormat,
    output: Option<&PathBuf>,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    // Show spinner for text output (unless quiet)
    let spinner = style::scanning_spinner(
        "Bluetooth devices",
        !quiet && matches!(format, OutputFormat::Text),
    );

    let inventory = toolkit.scan_bluetooth().await;

    // Clear spinner before output
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    let inventory = filter.apply(inventory);
    let content = render_inventory(&inventory, format, opts)?;
    write_output(output, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinhat_core::{CommandSpec, DeviceRecord, MockRunner};

    const OUTPUT: &str =
        "Connected:\n  Keyboard:\n    Address: AA:BB:CC:DD:EE:01\n    Minor Type: Keyboard\n";

    fn inventory() -> Inventory {
        Inventory {
            connected: vec![DeviceRecord::new("AA:BB:CC:DD:EE:01", true)],
            nearby: vec![DeviceRecord::new("AA:BB:CC:DD:EE:02", false)],
        }
    }

    #[test]
    fn test_filter_from_flags() {
        assert_eq!(DeviceFilter::from_flags(false, false), DeviceFilter::All);
        assert_eq!(DeviceFilter::from_flags(true, false), DeviceFilter::Connected);
        assert_eq!(DeviceFilter::from_flags(false, true), DeviceFilter::Nearby);
    }

    #[test]
    fn test_filter_apply() {
        let all = DeviceFilter::All.apply(inventory());
        assert_eq!(all.len(), 2);

        let connected = DeviceFilter::Connected.apply(inventory());
        assert_eq!(connected.connected.len(), 1);
        assert!(connected.nearby.is_empty());

        let nearby = DeviceFilter::Nearby.apply(inventory());
        assert!(nearby.connected.is_empty());
        assert_eq!(nearby.nearby.len(), 1);
    }

    #[tokio::test]
    async fn test_cmd_scan_writes_csv() {
        let runner = MockRunner::builder()
            .success(CommandSpec::bluetooth_inventory(), OUTPUT)
            .build();
        let mut toolkit = Toolkit::new(runner);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");
        let opts = FormatOptions::new(true, crate::cli::StyleMode::Plain);

        cmd_scan(
            &mut toolkit,
            DeviceFilter::Connected,
            OutputFormat::Csv,
            Some(&path),
            true,
            &opts,
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "name,address,type,connected,battery\nKeyboard,AA:BB:CC:DD:EE:01,Keyboard,true,\n"
        );
    }

    #[tokio::test]
    async fn test_cmd_scan_missing_utility_is_empty() {
        let mut toolkit = Toolkit::new(MockRunner::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        let opts = FormatOptions::default();

        cmd_scan(
            &mut toolkit,
            DeviceFilter::All,
            OutputFormat::Json,
            Some(&path),
            true,
            &opts,
        )
        .await
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["count"], 0);
    }
}
