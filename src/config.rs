//! Configuration file support
//!
//! A small TOML file in the user config directory carries defaults for
//! sample extraction and template selection. Missing or unreadable config
//! falls back to the built-in defaults; nothing here is required for a run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples requested per column.
    pub sample_limit: usize,
    /// Deduplicate samples by formatted value.
    pub distinct_samples: bool,
    /// Distinct instances kept per column in the chaining stage.
    pub chain_value_cap: usize,
    /// Default analysis template: "cot-few-shot" or "zero-shot".
    pub default_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_limit: 2,
            distinct_samples: false,
            chain_value_cap: 20,
            default_template: "cot-few-shot".to_string(),
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlprompt").join("config.toml"))
    }

    /// Load the config file, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "[Config::load] Invalid config at {}, using defaults: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

}
