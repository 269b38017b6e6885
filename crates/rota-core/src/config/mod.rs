//! Configuration management for Rota.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file holding the stored API key.
const CREDENTIALS_FILE: &str = "credentials.toml";

/// Root configuration structure for Rota.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API settings
    pub gemini: GeminiConfig,

    /// Route request settings
    pub optimize: OptimizeConfig,

    /// Instruction text settings
    pub prompt: PromptConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Stored credential settings
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.rota.rota/config.toml
    /// - Linux: ~/.config/rota/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\rota\config\config.toml
    ///
    /// Falls back to ~/.rota/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "rota", "rota")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".rota").join("config.toml")
            })
    }

    /// Get the credential file path (with ~ expansion).
    ///
    /// Co-located with the config file unless `credentials.path` overrides it.
    pub fn credentials_path(&self) -> PathBuf {
        match &self.credentials.path {
            Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
            None => {
                let config_path = Self::default_path();
                config_path
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join(CREDENTIALS_FILE)
            }
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
