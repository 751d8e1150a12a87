//! Shared helpers for command implementations.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, theme::ColorfulTheme};
use tinhat_core::{SystemRunner, Toolkit};

use crate::config::Config;

/// Build a toolkit for the real system utilities.
pub fn system_toolkit(config: &Config, interface: Option<&str>) -> Result<Toolkit<SystemRunner>> {
    let options = config.toolkit_options(interface);
    Toolkit::with_options(SystemRunner, options).context("Invalid toolkit configuration")
}

/// Ask a yes/no question. `assume_yes` skips the prompt.
///
/// Without a terminal there is nobody to ask, so the caller must pass `--yes`.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        bail!("{} Refusing without a terminal; pass --yes to confirm", prompt);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Append output to file or write it to stdout. Used by polling commands.
pub fn append_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_assume_yes() {
        assert!(confirm("Forget device?", true).unwrap());
    }

    #[test]
    fn test_write_output_to_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "first\n").unwrap();
        write_output(Some(&path), "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_append_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.csv");
        append_output(Some(&path), "a\n").unwrap();
        append_output(Some(&path), "b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_write_output_bad_path_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = write_output(Some(&path), "x").unwrap_err();
        assert!(err.to_string().contains("Failed to write to"));
    }

    #[test]
    fn test_system_toolkit_rejects_bad_interface() {
        let config = Config::default();
        assert!(system_toolkit(&config, Some("en0 -x")).is_err());
        assert!(system_toolkit(&config, Some("en1")).is_ok());
    }
}
