//! Command implementations for the CLI.

mod config;
mod control;
mod discoverable;
mod doctor;
mod report;
mod scan;
mod watch;
mod wifi;

pub use config::cmd_config;
pub use control::cmd_control;
pub use discoverable::cmd_discoverable;
pub use doctor::cmd_doctor;
pub use report::cmd_report;
pub use scan::{DeviceFilter, cmd_scan};
pub use watch::{WatchArgs, cmd_watch};
pub use wifi::{cmd_wifi_power, cmd_wifi_scan, cmd_wifi_status};
