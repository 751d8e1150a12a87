use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tinhat_core::DeviceAction;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use cli::{Cli, Commands, WifiAction};
use commands::{
    DeviceFilter, WatchArgs, cmd_config, cmd_control, cmd_discoverable, cmd_doctor, cmd_report,
    cmd_scan, cmd_watch, cmd_wifi_power, cmd_wifi_scan, cmd_wifi_status,
};
use config::{Config, resolve_format, resolve_interval};
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "tinhat", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Config commands work on the file directly and never touch the toolkit
    if let Commands::Config { action } = &cli.command {
        let content = cmd_config(action, &Config::path())?;
        return util::write_output(cli.output.as_ref(), &content);
    }

    let config = Config::load();
    let no_color = cli.no_color || config.no_color;
    let opts = FormatOptions::new(no_color, cli.style).with_compact(cli.compact);
    let output = cli.output.as_ref();
    let quiet = cli.quiet;
    let mut toolkit = util::system_toolkit(&config, cli.interface.as_deref())?;

    match cli.command {
        Commands::Scan {
            output: out,
            connected,
            nearby,
        } => {
            let format = resolve_format(cli.json, out.format, &config);
            let opts = opts.with_no_header(out.no_header);
            cmd_scan(
                &mut toolkit,
                DeviceFilter::from_flags(connected, nearby),
                format,
                output,
                quiet,
                &opts,
            )
            .await?;
        }
        Commands::Wifi { action } => match action {
            WifiAction::Scan { output: out, limit } => {
                let format = resolve_format(cli.json, out.format, &config);
                let opts = opts.with_no_header(out.no_header);
                cmd_wifi_scan(&mut toolkit, limit, format, output, quiet, &opts).await?;
            }
            WifiAction::Status => {
                let format = resolve_format(cli.json, None, &config);
                cmd_wifi_status(&mut toolkit, format, output, &opts).await?;
            }
            WifiAction::Power { state } => {
                cmd_wifi_power(&mut toolkit, state.is_on(), quiet, no_color).await?;
            }
        },
        Commands::Connect { address } => {
            cmd_control(
                &mut toolkit,
                DeviceAction::Connect,
                &address,
                false,
                quiet,
                no_color,
            )
            .await?;
        }
        Commands::Disconnect { address } => {
            cmd_control(
                &mut toolkit,
                DeviceAction::Disconnect,
                &address,
                false,
                quiet,
                no_color,
            )
            .await?;
        }
        Commands::Forget { address, yes } => {
            cmd_control(
                &mut toolkit,
                DeviceAction::Forget,
                &address,
                yes,
                quiet,
                no_color,
            )
            .await?;
        }
        Commands::Discoverable { state } => {
            let format = resolve_format(cli.json, None, &config);
            cmd_discoverable(&mut toolkit, state, format, output, quiet, &opts).await?;
        }
        Commands::Watch {
            interval,
            count,
            format,
        } => {
            let format = resolve_format(cli.json, format, &config);
            cmd_watch(
                &mut toolkit,
                WatchArgs {
                    interval: resolve_interval(interval, &config),
                    count,
                    format,
                    output,
                    headset_alert: config.headset_alert(),
                    show_wifi: config.show_wifi,
                    quiet,
                    opts: &opts,
                },
            )
            .await?;
        }
        Commands::Report { no_wifi } => {
            let include_wifi = config.show_wifi && !no_wifi;
            cmd_report(&mut toolkit, include_wifi, output, quiet, &opts).await?;
        }
        Commands::Doctor => {
            cmd_doctor(&mut toolkit, cli.verbose, no_color).await?;
        }
        Commands::Config { .. } | Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }

    Ok(())
}
