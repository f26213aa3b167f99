//! Config command.

use super::load_config;
use anyhow::{bail, Context, Result};
use behave_core::{Config, CONFIG_FILE_NAME};
use console::style;
use std::path::Path;

/// Print the effective configuration, or write a default one with `init`.
pub fn run(config_path: Option<&Path>, init: bool) -> Result<()> {
    if init {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        return init_in(&cwd);
    }

    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn init_in(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    Config::default().save(dir)?;
    println!(
        "{} Wrote default configuration to {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    Ok(())
}
