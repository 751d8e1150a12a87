//! Doctor command implementation.
//!
//! Checks that the utilities the toolkit drives are installed and that a
//! live Bluetooth inventory can be read.

use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use tinhat_core::commands::{BLUEUTIL, NETWORKSETUP};
use tinhat_core::{CommandRunner, CommandSpec, Toolkit};

use crate::style;

const TOTAL_CHECKS: usize = 4;

/// Check result with status and message.
#[derive(Debug)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub warning: bool,
    pub message: String,
}

impl Check {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            warning: false,
            message: message.into(),
        }
    }

    fn warn(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            warning: true,
            message: message.into(),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            warning: false,
            message: message.into(),
        }
    }
}

pub async fn cmd_doctor<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    verbose: bool,
    no_color: bool,
) -> Result<()> {
    println!(
        "{}",
        style::format_title("tinhat doctor - system utility checks", no_color)
    );
    println!();

    let checks = run_checks(toolkit).await;
    for (i, check) in checks.iter().enumerate() {
        print_check(i + 1, check, no_color);
    }

    println!();
    println!("{}", style::separator(50));

    let (passed, warnings, failed) = summarize(&checks);
    let summary = if no_color {
        format!(
            "Summary: {} passed, {} warnings, {} failed",
            passed, warnings, failed
        )
    } else {
        format!(
            "Summary: {} passed, {} warnings, {} failed",
            format!("{}", passed).green(),
            format!("{}", warnings).yellow(),
            format!("{}", failed).red()
        )
    };
    println!("{}", summary);
    println!();

    if failed > 0 {
        print_troubleshooting_help(&checks, verbose, no_color);
    } else if warnings > 0 {
        println!("Scanning works but some features are unavailable.");
        println!("Run with --verbose for more details.");
    } else {
        println!(
            "{}",
            style::format_success("All checks passed.", no_color)
        );
    }

    Ok(())
}

/// Run every check without printing.
pub async fn run_checks<R: CommandRunner>(toolkit: &mut Toolkit<R>) -> Vec<Check> {
    vec![
        check_inventory(toolkit).await,
        check_blueutil(toolkit).await,
        check_networksetup(toolkit).await,
        check_airport(toolkit).await,
    ]
}

/// Counts of passed, warning and failed checks.
pub fn summarize(checks: &[Check]) -> (usize, usize, usize) {
    let passed = checks.iter().filter(|c| c.passed && !c.warning).count();
    let warnings = checks.iter().filter(|c| c.warning).count();
    let failed = checks.iter().filter(|c| !c.passed).count();
    (passed, warnings, failed)
}

fn print_check(num: usize, check: &Check, no_color: bool) {
    let label = if no_color {
        format!("[{}/{}]", num, TOTAL_CHECKS)
    } else {
        format!("{}", format!("[{}/{}]", num, TOTAL_CHECKS).dimmed())
    };
    let (icon, msg) = if check.passed && !check.warning {
        if no_color {
            ("[OK]".to_string(), check.message.clone())
        } else {
            (format!("{}", "[OK]".green()), check.message.clone())
        }
    } else if check.warning {
        if no_color {
            ("[!!]".to_string(), check.message.clone())
        } else {
            (
                format!("{}", "[!!]".yellow()),
                format!("{}", check.message.yellow()),
            )
        }
    } else if no_color {
        ("[FAIL]".to_string(), check.message.clone())
    } else {
        (
            format!("{}", "[FAIL]".red()),
            format!("{}", check.message.red()),
        )
    };
    println!("{} {} ... {} {}", label, check.name, icon, msg);
}

async fn check_inventory<R: CommandRunner>(toolkit: &mut Toolkit<R>) -> Check {
    const NAME: &str = "Bluetooth inventory";
    match toolkit.try_scan_bluetooth().await {
        Ok(inventory) if inventory.is_empty() => {
            Check::warn(NAME, "Readable, but no paired devices found")
        }
        Ok(inventory) => Check::pass(
            NAME,
            format!(
                "{} connected, {} nearby",
                inventory.connected.len(),
                inventory.nearby.len()
            ),
        ),
        Err(e) => Check::fail(NAME, format!("Failed ({})", e)),
    }
}

async fn check_blueutil<R: CommandRunner>(toolkit: &mut Toolkit<R>) -> Check {
    const NAME: &str = "blueutil";
    let spec = CommandSpec::new(BLUEUTIL, Duration::from_secs(2)).arg("--version");
    match toolkit.runner().run_checked(&spec).await {
        Ok(output) => {
            let version = output.stdout.trim();
            if version.is_empty() {
                Check::pass(NAME, "Installed")
            } else {
                Check::pass(NAME, format!("Installed ({})", version))
            }
        }
        Err(e) if e.is_unavailable() => Check::fail(
            NAME,
            "Not installed; connect, disconnect, forget and discoverable will fail",
        ),
        Err(e) => Check::fail(NAME, format!("Failed ({})", e)),
    }
}

async fn check_networksetup<R: CommandRunner>(toolkit: &mut Toolkit<R>) -> Check {
    const NAME: &str = "networksetup";
    let interface = toolkit.options().interface.clone();
    let spec = CommandSpec::wifi_power_state(&interface);
    match toolkit.runner().run_checked(&spec).await {
        Ok(output) => Check::pass(NAME, output.stdout.trim().to_string()),
        Err(e) => Check::fail(NAME, format!("Failed on {} ({})", interface, e)),
    }
}

async fn check_airport<R: CommandRunner>(toolkit: &mut Toolkit<R>) -> Check {
    const NAME: &str = "airport";
    match toolkit.try_scan_wifi().await {
        Ok(networks) => Check::pass(NAME, format!("{} networks visible", networks.len())),
        // Removed on recent macOS releases; only WiFi scanning is affected
        Err(e) if e.is_unavailable() => {
            Check::warn(NAME, "Not found; WiFi scanning is unavailable")
        }
        Err(e) => Check::warn(NAME, format!("WiFi scan failed ({})", e)),
    }
}

fn print_troubleshooting_help(checks: &[Check], verbose: bool, no_color: bool) {
    let title = if no_color {
        "Troubleshooting Tips:".to_string()
    } else {
        format!("{}", "Troubleshooting Tips:".yellow())
    };
    println!("{}", title);
    println!();

    let failed = |name: &str| checks.iter().any(|c| c.name == name && !c.passed);

    if cfg!(not(target_os = "macos")) {
        println!("  • tinhat drives macOS system utilities and only works on macOS");
    }
    if failed("Bluetooth inventory") {
        println!("  • Ensure Bluetooth is enabled in System Settings");
        println!("  • Try: system_profiler SPBluetoothDataType");
    }
    if failed("blueutil") {
        println!("  • Install blueutil: brew install blueutil");
    }
    if failed("networksetup") {
        println!("  • Check the interface name: networksetup -listallhardwareports");
        println!("  • Set it with: tinhat config set interface <name>");
    }
    if verbose {
        println!("  • Run with RUST_LOG=debug to see every command line");
    }

    println!();
}
