//! Configuration for inspectors and the test runner.

use crate::error::{BehaveError, Result};
use crate::tags::{NameFilter, Selection, TagFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up by [`Config::load`].
pub const CONFIG_FILE_NAME: &str = "behave.toml";

/// Top-level configuration, usually read from `behave.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Failure message rendering for quantified assertions.
    #[serde(default)]
    pub inspectors: InspectorConfig,

    /// Test selection and execution.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl Config {
    /// Load configuration from `behave.toml` under `root`, or defaults when
    /// the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_file(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicit file path.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BehaveError::ConfigError(format!("failed to read config: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| BehaveError::ConfigError(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `behave.toml` under `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = self.to_toml_string()?;
        fs::write(&path, content)
            .map_err(|e| BehaveError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Render configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BehaveError::ConfigError(format!("failed to serialize config: {}", e)))
    }

    fn validate(&self) -> Result<()> {
        if self.inspectors.display_limit == 0 {
            return Err(BehaveError::ConfigError(
                "inspectors.display_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// How quantified assertion failures are rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct InspectorConfig {
    /// Maximum element lines listed in a failure message (default: 10).
    pub display_limit: usize,

    /// Maximum elements rendered when echoing the inspected collection
    /// (default: 32).
    pub max_rendered_elements: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            display_limit: 10,
            max_rendered_elements: 32,
        }
    }
}

/// Test selection and execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Only run tests carrying at least one of these tags.
    pub include_tags: Vec<String>,

    /// Never run tests carrying any of these tags.
    pub exclude_tags: Vec<String>,

    /// Only run tests whose full name matches one of these filters.
    pub include_filters: Vec<String>,

    /// Never run tests whose full name matches one of these filters.
    pub exclude_filters: Vec<String>,

    /// Match name filters exactly instead of by substring.
    pub exact_match: bool,

    /// Stop after the first failing test.
    pub fail_fast: bool,
}

impl RunnerConfig {
    /// Builds the selection described by this configuration.
    pub fn selection(&self) -> Selection {
        Selection {
            tags: TagFilter::new(self.include_tags.iter(), self.exclude_tags.iter()),
            names: NameFilter {
                include: self.include_filters.clone(),
                exclude: self.exclude_filters.clone(),
                exact: self.exact_match,
            },
        }
    }
}
