//! Watch command implementation.
//!
//! Polls the Bluetooth inventory on a fixed interval, records an exposure
//! sample per poll in a [`SessionState`], and warns once when a headset has
//! stayed connected past the alert threshold. Repeated polls inside the
//! inventory cache lifetime reuse the cached scan.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use time::OffsetDateTime;
use tinhat_core::{CommandRunner, SessionState, Toolkit};

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, format_watch_csv_header, format_watch_csv_line, format_watch_json,
    format_watch_line,
};
use crate::style;
use crate::util::append_output;

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub interval: u64,
    pub count: u32,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub headset_alert: Duration,
    pub show_wifi: bool,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    args: WatchArgs<'_>,
) -> Result<SessionState> {
    let WatchArgs {
        interval,
        count,
        format,
        output,
        headset_alert,
        show_wifi,
        quiet,
        opts,
    } = args;

    let mut session = SessionState::new();
    // A previous run already wrote the header into a non-empty output file
    let mut header_written = opts.no_header || output.is_some_and(|path| has_content(path));
    let mut alerted = false;

    if !quiet {
        if count > 0 {
            eprintln!(
                "Interval: {}s | Count: {} | Press Ctrl+C to stop",
                interval, count
            );
        } else {
            eprintln!("Interval: {}s | Press Ctrl+C to stop", interval);
        }
        eprintln!("{}", style::separator(50));
    }

    loop {
        // Check if we've reached the count limit
        if count > 0 && session.polls() >= u64::from(count) {
            if !quiet {
                eprintln!("Completed {} polls.", session.polls());
            }
            return Ok(session);
        }

        let inventory = toolkit.scan_bluetooth().await;
        let now = OffsetDateTime::now_utc();
        let assessment = session.record(&inventory, now);

        let mut content = match format {
            OutputFormat::Json => format_watch_json(now, &inventory, &assessment)?,
            OutputFormat::Csv => {
                let mut out = String::new();
                if !header_written {
                    out.push_str(&format_watch_csv_header(opts));
                    header_written = true;
                }
                out.push_str(&format_watch_csv_line(now, &inventory, &assessment));
                out
            }
            OutputFormat::Text => format_watch_line(now, &inventory, &assessment, opts),
        };

        if show_wifi && format == OutputFormat::Text {
            let network = toolkit.current_network().await;
            content.push_str(&format!(
                "         WiFi: {}\n",
                network.as_deref().unwrap_or("(not associated)")
            ));
        }

        append_output(output, &content)?;

        match session.headset_alert(headset_alert, now) {
            Some(on_for) if !alerted => {
                alerted = true;
                let message = format!(
                    "Headset connected for {} minutes. Consider taking a break.",
                    on_for.as_secs() / 60
                );
                if opts.no_color {
                    eprintln!("{}", style::format_warning(&message, true));
                } else {
                    eprintln!("{}", style::format_warning(&message, false).bold());
                }
            }
            Some(_) => {}
            None => alerted = false,
        }

        // Check if we've reached the count limit after this poll
        if count > 0 && session.polls() >= u64::from(count) {
            continue; // Loop will exit at the top
        }

        // Wait for next interval with graceful shutdown support
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if !quiet {
                    eprintln!("\nShutting down...");
                }
                return Ok(session);
            }
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
        }
    }
}

fn has_content(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.len() > 0)
}
