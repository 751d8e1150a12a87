//! Report command implementation.
//!
//! Takes one snapshot of the Bluetooth inventory and, optionally, the
//! visible WiFi networks, and exports it together with the exposure
//! assessment as a single JSON document.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use time::OffsetDateTime;
use tinhat_core::{
    CommandRunner, ExposureLevel, ExposureSample, Inventory, NetworkRecord, SessionState, Toolkit,
};

use crate::format::{FormatOptions, format_timestamp};
use crate::style;
use crate::util::write_output;

#[derive(Debug, Serialize)]
pub struct Report {
    pub timestamp: String,
    pub devices: Inventory,
    pub networks: Vec<NetworkRecord>,
    pub exposure: ExposureReport,
}

#[derive(Debug, Serialize)]
pub struct ExposureReport {
    pub level: ExposureLevel,
    pub score: u32,
    pub device_count: usize,
    pub recommendation: &'static str,
    pub history: Vec<ExposureSample>,
}

/// Collect a report snapshot taken at `now`.
pub async fn build_report<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    include_wifi: bool,
    now: OffsetDateTime,
) -> Report {
    let devices = toolkit.scan_bluetooth().await;
    let networks = if include_wifi {
        toolkit.scan_wifi().await
    } else {
        Vec::new()
    };

    let mut session = SessionState::new();
    let assessment = session.record(&devices, now);

    Report {
        timestamp: format_timestamp(now),
        devices,
        networks,
        exposure: ExposureReport {
            level: assessment.level,
            score: assessment.score,
            device_count: assessment.device_count,
            recommendation: assessment.level.action(),
            history: session.exposure_log().cloned().collect(),
        },
    }
}

pub async fn cmd_report<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    include_wifi: bool,
    output: Option<&PathBuf>,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let spinner = style::scanning_spinner("devices", !quiet && output.is_some());
    let report = build_report(toolkit, include_wifi, OffsetDateTime::now_utc()).await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    let content = opts.as_json(&report)?;
    write_output(output, &content)?;

    if let Some(path) = output
        && !quiet
    {
        eprintln!(
            "{}",
            style::format_success(
                &format!("Report saved to {}", path.display()),
                opts.no_color
            )
        );
    }
    Ok(())
}
