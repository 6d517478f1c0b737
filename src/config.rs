//! Configuration loading and management
//!
//! Handles parsing of `.tasktrackr.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Name of the per-directory configuration file
pub const CONFIG_FILE: &str = ".tasktrackr.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tasks file, relative to the directory holding the config
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,

    /// Task defaults and priority labels
    #[serde(default)]
    pub tasks: TasksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            tasks: TasksConfig::default(),
        }
    }
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("tasks.json")
}

/// Tasks configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    /// Priority applied when none is given
    #[serde(default = "default_priority")]
    pub default_priority: String,

    /// Known priority labels, in canonical spelling
    #[serde(default = "default_priorities")]
    pub priorities: Vec<String>,

    /// Reject labels outside `priorities`
    #[serde(default)]
    pub strict_priorities: bool,
}

fn default_priority() -> String {
    "Medium".to_string()
}

fn default_priorities() -> Vec<String> {
    vec!["Low".to_string(), "Medium".to_string(), "High".to_string()]
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            priorities: default_priorities(),
            strict_priorities: false,
        }
    }
}

impl TasksConfig {
    /// Map a priority label to its canonical spelling.
    ///
    /// Known labels match case-insensitively. Unknown labels pass through
    /// trimmed unless `strict_priorities` is set.
    pub fn normalize_priority(&self, value: &str) -> Result<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("priority cannot be empty".to_string()));
        }
        if let Some(known) = self
            .priorities
            .iter()
            .find(|entry| entry.eq_ignore_ascii_case(trimmed))
        {
            return Ok(known.clone());
        }
        if self.strict_priorities {
            return Err(Error::InvalidInput(format!(
                "unknown priority '{trimmed}' (expected one of: {})",
                self.priorities.join(", ")
            )));
        }
        Ok(trimmed.to_string())
    }

    fn validate(&self) -> Result<()> {
        if self.priorities.is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.priorities cannot be empty".to_string(),
            ));
        }
        if self.priorities.iter().any(|entry| entry.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "tasks.priorities cannot contain blank labels".to_string(),
            ));
        }
        if !self
            .priorities
            .iter()
            .any(|entry| entry == &self.default_priority)
        {
            return Err(Error::InvalidConfig(format!(
                "tasks.default_priority '{}' must be one of tasks.priorities",
                self.default_priority
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `.tasktrackr.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory.
    ///
    /// A missing file means defaults. A file that exists but does not parse
    /// or validate is an error, never silently replaced by defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let config = Self::load(&config_path)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    /// Resolve the tasks file against the config directory
    pub fn tasks_path(&self, dir: &Path) -> PathBuf {
        if self.tasks_file.is_absolute() {
            self.tasks_file.clone()
        } else {
            dir.join(&self.tasks_file)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tasks_file.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("tasks_file cannot be empty".to_string()));
        }
        self.tasks.validate()
    }
}
