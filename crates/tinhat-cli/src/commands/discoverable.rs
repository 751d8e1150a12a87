//! Discoverable command implementation.

use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::Serialize;
use tinhat_core::{CommandRunner, Toolkit};

use crate::cli::{OutputFormat, Toggle};
use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

#[derive(Serialize)]
struct DiscoverableJson {
    discoverable: bool,
}

pub async fn cmd_discoverable<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    state: Option<Toggle>,
    format: OutputFormat,
    output: Option<&PathBuf>,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    if let Some(state) = state {
        if !toolkit.set_discoverable(state.is_on()).await {
            bail!(
                "Failed to turn discoverable {}",
                if state.is_on() { "on" } else { "off" }
            );
        }
        if !quiet {
            let message = if state.is_on() {
                "This Mac is now discoverable"
            } else {
                "This Mac is now hidden"
            };
            println!("{}", style::format_success(message, opts.no_color));
        }
        return Ok(());
    }

    let discoverable = toolkit.discoverable().await;
    let content = match format {
        OutputFormat::Json => opts.as_json(&DiscoverableJson { discoverable })?,
        OutputFormat::Csv => {
            let header = if opts.no_header { "" } else { "discoverable\n" };
            format!("{}{}\n", header, discoverable)
        }
        OutputFormat::Text => format!(
            "{}\n",
            if discoverable {
                style::format_warning("Discoverable: on", opts.no_color)
            } else {
                style::format_info("Discoverable: off", opts.no_color)
            }
        ),
    };
    write_output(output, &content)
}
