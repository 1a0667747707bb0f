//! Engine configuration loading.
//!
//! Configuration lives in an optional TOML file:
//!
//! ```toml
//! upcoming_grace_minutes = 30
//!
//! [messages]
//! load_failed = "Failed to load schedule"
//! invalid_data = "Failed to load schedule: invalid data from server"
//! empty_body = "Failed to load schedule: server returned an empty body"
//! ```
//!
//! A missing file yields defaults. The messages are shown to users verbatim
//! whenever the backend does not supply its own.

use crate::error::{Result, ScheduleError};
use crate::query::{DEFAULT_UPCOMING_GRACE_MINUTES, MAX_UPCOMING_GRACE_MINUTES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long after its start a class still counts as upcoming.
    pub upcoming_grace_minutes: i64,
    pub messages: MessageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upcoming_grace_minutes: DEFAULT_UPCOMING_GRACE_MINUTES,
            messages: MessageConfig::default(),
        }
    }
}

/// Fallback texts used when the backend gives no `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub load_failed: String,
    pub invalid_data: String,
    pub empty_body: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            load_failed: "Failed to load schedule".to_string(),
            invalid_data: "Failed to load schedule: invalid data from server".to_string(),
            empty_body: "Failed to load schedule: server returned an empty body".to_string(),
        }
    }
}

/// Returns the default config path (`<config dir>/rollcall/engine.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rollcall").join("engine.toml"))
}

/// Loads the engine configuration, returning defaults if the file doesn't exist.
pub fn load_engine_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    let config_path = match path.or_else(default_config_path) {
        Some(path) => path,
        None => return Ok(EngineConfig::default()),
    };

    if !config_path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| ScheduleError::Io {
        context: "reading engine config".to_string(),
        source,
    })?;
    let config: EngineConfig =
        toml::from_str(&content).map_err(|err| ScheduleError::ConfigMalformed {
            path: config_path.clone(),
            details: err.to_string(),
        })?;

    if !(0..=MAX_UPCOMING_GRACE_MINUTES).contains(&config.upcoming_grace_minutes) {
        return Err(ScheduleError::ConfigMalformed {
            path: config_path,
            details: format!(
                "upcoming_grace_minutes must be between 0 and {}",
                MAX_UPCOMING_GRACE_MINUTES
            ),
        });
    }

    Ok(config)
}
