//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;

/// Run a config action against the file at `path` and return what to print.
pub fn cmd_config(action: &ConfigAction, path: &Path) -> Result<String> {
    match action {
        ConfigAction::Path => Ok(format!("{}\n", path.display())),
        ConfigAction::Show => {
            let config = Config::load_from(path);
            toml::to_string_pretty(&config).context("Failed to serialize config")
        }
        ConfigAction::Init => {
            if path.exists() {
                bail!("Config file already exists: {}", path.display());
            }
            Config::default().save_to(path)?;
            Ok(format!("Created {}\n", path.display()))
        }
        ConfigAction::Get { key } => {
            let config = Config::load_from(path);
            Ok(match config.get(*key) {
                Some(value) => format!("{}\n", value),
                None => format!("{} is not set\n", key.name()),
            })
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(path);
            config.set(*key, value)?;
            config.save_to(path)?;
            Ok(format!("Set {} = {}\n", key.name(), value))
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load_from(path);
            config.unset(*key);
            config.save_to(path)?;
            Ok(format!("Unset {}\n", key.name()))
        }
    }
}
