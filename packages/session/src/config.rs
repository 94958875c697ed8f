//! Session configuration.
//!
//! Loaded from TOML. Every field is optional:
//!
//! ```toml
//! history_capacity = 300
//! debounce_ms = 200
//!
//! [search]
//! suggest_limit = 5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use survey_map_router::{DEFAULT_DEBOUNCE_WINDOW, DEFAULT_HISTORY_CAPACITY};
use survey_map_search::SearchConfig;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value was parsed but is unusable.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Tunables for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of routes kept in history.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Quiescence window for viewport-driven refreshes, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Search tuning.
    #[serde(default)]
    pub search: SearchConfig,
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

#[allow(clippy::cast_possible_truncation)]
const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_WINDOW.as_millis() as u64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            debounce_ms: default_debounce_ms(),
            search: SearchConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is
    /// out of range.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("Loading session config from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Conversion {
                message: "history_capacity must be at least 1".to_string(),
            });
        }
        if self.search.suggest_limit == 0 || self.search.lookup_limit == 0 {
            return Err(ConfigError::Conversion {
                message: "search result limits must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Debounce window as a [`Duration`].
    #[must_use]
    pub const fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
