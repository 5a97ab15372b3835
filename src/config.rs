use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::DEFAULT_OVERDUE_DAYS;
use crate::error::{RosterError, Result};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "roster.yaml";

/// Roster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Players fixture file. `None` uses the built-in roster.
    pub players_path: Option<PathBuf>,
    /// Notes fixture file. `None` uses the built-in notes.
    pub notes_path: Option<PathBuf>,
    /// Identity stamped on every note written in a session.
    pub author: String,
    pub overdue_after_days: i64,
    pub load_delay_ms: u64,
    pub submit_delay_ms: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            players_path: None,
            notes_path: None,
            author: "Coach Ahmed".to_string(),
            overdue_after_days: DEFAULT_OVERDUE_DAYS,
            load_delay_ms: 1000,
            submit_delay_ms: 500,
        }
    }
}

impl RosterConfig {
    /// Default config with both artificial delays disabled.
    pub fn instant() -> Self {
        Self {
            load_delay_ms: 0,
            submit_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "reading config");
        Self::from_yaml(&text)
    }

    /// Load `path` if given, else `roster.yaml` in `dir` if it exists, else
    /// defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.exists() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.author.trim().is_empty() {
            return Err(RosterError::Config("author must not be empty".to_string()));
        }
        if self.overdue_after_days < 0 {
            return Err(RosterError::Config(format!(
                "overdue_after_days must not be negative (got {})",
                self.overdue_after_days
            )));
        }
        Ok(())
    }
}
