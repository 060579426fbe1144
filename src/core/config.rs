//! Assistant configuration loaded from TOML
//!
//! Every field has a default, so a missing file or a partial file both work.

use crate::core::error::{ReminderError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the reminder store file
pub const DEFAULT_STORE_PATH: &str = "data/reminders.json";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "voice_reminder=info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    /// Where reminders are persisted
    pub store_path: PathBuf,

    /// tracing-subscriber filter directive
    pub log_filter: String,

    /// Say "Reminder scheduled." after an alarm is set
    pub announce_schedule: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            announce_schedule: true,
        }
    }
}

impl AssistantConfig {
    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AssistantConfig = toml::from_str(content)?;
        config.validate().map_err(ReminderError::Config)?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.store_path.as_os_str().is_empty() {
            return Err("store_path must not be empty".into());
        }
        if self.log_filter.trim().is_empty() {
            return Err("log_filter must not be empty".into());
        }
        Ok(())
    }
}
