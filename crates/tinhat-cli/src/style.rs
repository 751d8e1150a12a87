//! Visual styling utilities for the CLI.
//!
//! This module provides consistent styling across all CLI output including:
//! - Spinners for scans and device commands
//! - Exposure and battery coloring
//! - Table formatting

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tinhat_core::{ExposureLevel, Risk};

use crate::cli::StyleMode;

// ============================================================================
// Progress Indicators
// ============================================================================

/// Standard spinner tick characters (Braille dots animation)
const SPINNER_TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard spinner tick interval
const SPINNER_TICK_MS: u64 = 80;

/// Get the standard spinner style.
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_TICK_CHARS)
}

/// Create a spinner with a message.
pub fn operation_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    pb
}

/// Spinner for a scan, or `None` when output should stay quiet.
pub fn scanning_spinner(what: &str, show: bool) -> Option<ProgressBar> {
    show.then(|| operation_spinner(&format!("Scanning {}...", what)))
}

// ============================================================================
// Battery
// ============================================================================

/// Battery thresholds (percentage).
pub mod battery {
    pub const LOW: u8 = 20; // Red: < 20%
    pub const MEDIUM: u8 = 40; // Yellow: 20-40%
}

/// Format a battery level with a color, or `-` when unknown.
pub fn format_battery(percent: Option<u8>, no_color: bool) -> String {
    let Some(percent) = percent else {
        return "-".to_string();
    };
    let text = format!("{}%", percent);
    if no_color {
        text
    } else if percent < battery::LOW {
        format!("{}", text.red())
    } else if percent < battery::MEDIUM {
        format!("{}", text.yellow())
    } else {
        format!("{}", text.green())
    }
}

// ============================================================================
// Signal Strength Bar
// ============================================================================

/// Format a signal quality percentage as a visual bar with the raw RSSI.
pub fn format_signal_bar(quality: u8, rssi: i32, no_color: bool) -> String {
    let filled = (usize::from(quality.min(100)) + 5) / 10;
    let empty = 10 - filled;

    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    if no_color {
        format!("{} {:>4}", bar, rssi)
    } else if filled >= 7 {
        format!("{} {:>4}", bar.green(), rssi)
    } else if filled >= 4 {
        format!("{} {:>4}", bar.yellow(), rssi)
    } else {
        format!("{} {:>4}", bar.red(), rssi)
    }
}

// ============================================================================
// Exposure
// ============================================================================

/// Format an exposure level as a badge.
pub fn format_exposure(level: ExposureLevel, no_color: bool) -> String {
    let label = level.to_string();
    if no_color {
        return format!("[{}]", label);
    }
    match level {
        ExposureLevel::Low => format!("[{}]", label.green().bold()),
        ExposureLevel::Moderate => format!("[{}]", label.yellow().bold()),
        ExposureLevel::High => format!("[{}]", label.red().bold()),
    }
}

/// Format a per-device risk marker.
pub fn format_risk(risk: Risk, no_color: bool) -> String {
    match (risk, no_color) {
        (Risk::Low, true) => "low".to_string(),
        (Risk::Monitor, true) => "monitor".to_string(),
        (Risk::Low, false) => format!("{}", "low".dimmed()),
        (Risk::Monitor, false) => format!("{}", "monitor".yellow()),
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format an info message.
pub fn format_info(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[--] {}", message)
    } else {
        format!("{} {}", "[--]".cyan(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    let underline = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, underline)
    } else {
        format!("{}\n{}", title.bold(), underline.dimmed())
    }
}

/// Get terminal width, defaulting to 80 if detection fails.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// A horizontal rule no wider than the terminal.
pub fn separator(max: usize) -> String {
    "─".repeat(terminal_width().min(max))
}

/// Apply table style based on StyleMode.
pub fn apply_table_style(table: &mut tabled::Table, style: StyleMode) {
    use tabled::settings::Style;
    match style {
        StyleMode::Rich => {
            table.with(Style::rounded());
        }
        StyleMode::Minimal => {
            table.with(Style::psql());
        }
        StyleMode::Plain => {
            table.with(Style::blank());
        }
    }
}
