use crate::error::{Result, UrbrainError};
use crate::store::is_valid_key;
use crate::view::DEFAULT_PREVIEW_LENGTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_KEY_PREFIX: &str = "urbrain_";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration for urbrain, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrbrainConfig {
    /// Prefix of the storage keys (`<prefix>folders`, `<prefix>notes`, ...)
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Characters of note content shown in listings
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,

    /// Log level used when neither `URBRAIN_LOG` nor `-v` say otherwise
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_preview_length() -> usize {
    DEFAULT_PREVIEW_LENGTH
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for UrbrainConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            preview_length: default_preview_length(),
            log_level: default_log_level(),
        }
    }
}

impl UrbrainConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: UrbrainConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["key-prefix", "preview-length", "log-level"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "key-prefix" => Some(self.key_prefix.clone()),
            "preview-length" => Some(self.preview_length.to_string()),
            "log-level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "key-prefix" => {
                let prefix = value.trim();
                if prefix.is_empty() {
                    return Err(UrbrainError::Config("key-prefix cannot be empty".into()));
                }
                if !is_valid_key(prefix) {
                    return Err(UrbrainError::Config(format!(
                        "key-prefix may only use letters, digits, '_', '-' and '.', and cannot start with '.', got {:?}",
                        prefix
                    )));
                }
                self.key_prefix = prefix.to_string();
            }
            "preview-length" => {
                self.preview_length = value.parse().map_err(|_| {
                    UrbrainError::Config(format!("preview-length must be a number, got {}", value))
                })?;
            }
            "log-level" => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(UrbrainError::Config(format!(
                        "log-level must be one of {}",
                        LOG_LEVELS.join(", ")
                    )));
                }
                self.log_level = level;
            }
            _ => return Err(UrbrainError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}
