//! YAML configuration for the bridge.
//!
//! Loaded once at startup and passed into each component; every error here
//! is fatal before the watch loop begins.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML in config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("data directory does not exist: {} (make sure ScreenPipe is running)", .0.display())]
    DataDirMissing(PathBuf),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub screenpipe: ScreenpipeConfig,
    pub obsidian: ObsidianConfig,
    pub mindpal: MindpalConfig,
    #[serde(default)]
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenpipeConfig {
    /// Directory ScreenPipe deposits capture files into.
    pub data_dir: String,
    /// Seconds between directory scans.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

fn default_poll_interval() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObsidianConfig {
    /// Vault directory notes are written into. Created if absent.
    pub vault_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MindpalConfig {
    pub base_url: String,
    /// Overridable via the MINDPAL_API_KEY environment variable.
    pub api_key: String,
    pub agent_id: String,
    /// Human-facing chatbot page; logged at startup when present.
    #[serde(default)]
    pub chatbot_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Write notes immediately instead of holding them for review.
    pub auto_approve: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&contents)?;

        if let Ok(api_key) = std::env::var("MINDPAL_API_KEY") {
            if !api_key.is_empty() {
                config.mindpal.api_key = api_key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.screenpipe.data_dir.is_empty() {
            return Err(ConfigError::Invalid(
                "screenpipe.data_dir is required".to_string(),
            ));
        }
        if self.screenpipe.poll_interval == 0 {
            return Err(ConfigError::Invalid(
                "screenpipe.poll_interval must be greater than zero".to_string(),
            ));
        }
        if self.obsidian.vault_dir.is_empty() {
            return Err(ConfigError::Invalid(
                "obsidian.vault_dir is required".to_string(),
            ));
        }
        if self.mindpal.base_url.is_empty() {
            return Err(ConfigError::Invalid(
                "mindpal.base_url is required".to_string(),
            ));
        }
        if self.mindpal.api_key.is_empty() {
            return Err(ConfigError::Invalid(
                "mindpal.api_key is required (set via config or MINDPAL_API_KEY env var)"
                    .to_string(),
            ));
        }
        if self.mindpal.agent_id.is_empty() {
            return Err(ConfigError::Invalid(
                "mindpal.agent_id is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.screenpipe.data_dir)
    }

    pub fn vault_dir(&self) -> PathBuf {
        expand_tilde(&self.obsidian.vault_dir)
    }

    /// The data directory must already exist when the loop starts; the vault
    /// directory is created on demand by the writer.
    pub fn ensure_data_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.data_dir();
        if !dir.is_dir() {
            return Err(ConfigError::DataDirMissing(dir));
        }
        Ok(dir)
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
