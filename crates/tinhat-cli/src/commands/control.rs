//! Connect, disconnect and forget commands.

use anyhow::{Result, bail};
use tinhat_core::{CommandRunner, DeviceAction, Toolkit, is_valid_address};

use crate::style;
use crate::util::confirm;

fn progress_message(action: DeviceAction, address: &str) -> String {
    match action {
        DeviceAction::Connect => format!("Connecting to {}...", address),
        DeviceAction::Disconnect => format!("Disconnecting {}...", address),
        DeviceAction::Forget => format!("Forgetting {}...", address),
    }
}

fn done_message(action: DeviceAction, address: &str) -> String {
    match action {
        DeviceAction::Connect => format!("Connected {}", address),
        DeviceAction::Disconnect => format!("Disconnected {}", address),
        DeviceAction::Forget => format!("Forgot {}", address),
    }
}

pub async fn cmd_control<R: CommandRunner>(
    toolkit: &mut Toolkit<R>,
    action: DeviceAction,
    address: &str,
    assume_yes: bool,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    // Reject before prompting; the toolkit validates again before running anything
    if !is_valid_address(address) {
        bail!(
            "Failed to {} {}: not a Bluetooth address (expected AA:BB:CC:DD:EE:FF)",
            action,
            address
        );
    }

    if action == DeviceAction::Forget {
        let prompt = format!(
            "Forget {}? The device will have to be paired again.",
            address
        );
        if !confirm(&prompt, assume_yes)? {
            if !quiet {
                eprintln!("Cancelled.");
            }
            return Ok(());
        }
    }

    let spinner = (!quiet).then(|| style::operation_spinner(&progress_message(action, address)));
    let result = toolkit.try_control(action, address).await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    if let Err(e) = result {
        bail!("Failed to {} {}: {}", action, address, e);
    }

    if !quiet {
        println!(
            "{}",
            style::format_success(&done_message(action, address), no_color)
        );
    }
    Ok(())
}
