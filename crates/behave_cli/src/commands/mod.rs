//! CLI commands.

pub mod config;
pub mod list;
pub mod run;

use anyhow::{bail, Context, Result};
use behave_core::{Config, RunnerConfig};
use clap::Args;
use std::path::Path;

/// Test selection flags shared by `run` and `list`.
#[derive(Args, Debug, Default)]
pub struct SelectionArgs {
    /// Only run checks carrying this tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Skip checks carrying this tag (repeatable)
    #[arg(long = "exclude-tag")]
    pub exclude_tags: Vec<String>,
    /// Only run checks whose name contains this text (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,
    /// Match --filter against whole names
    #[arg(long)]
    pub exact: bool,
}

impl SelectionArgs {
    /// Adds the command-line selection on top of the configured one.
    pub fn apply(&self, runner: &mut RunnerConfig) {
        runner.include_tags.extend(self.tags.iter().cloned());
        runner.exclude_tags.extend(self.exclude_tags.iter().cloned());
        runner.include_filters.extend(self.filters.iter().cloned());
        runner.exact_match |= self.exact;
    }
}

/// Loads `--config` if given, otherwise `behave.toml` from the current
/// directory, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Config::load(&cwd)?
        }
    };
    Ok(config)
}

/// Output formats of `run` and `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(format: &str) -> Result<Self> {
        match format {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("Unknown format '{}'. Use 'text' or 'json'.", other),
        }
    }
}

/// Suite name derived from the check file name.
pub fn suite_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "checks".to_string())
}
