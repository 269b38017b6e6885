//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::request::PromptLanguage;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.endpoint must not be empty".into(),
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.model must not be empty".into(),
            ));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gemini.timeout_secs must be > 0".into(),
            ));
        }
        if self.optimize.max_drivers == 0 {
            return Err(ConfigError::ValidationError(
                "optimize.max_drivers must be > 0".into(),
            ));
        }
        if self.optimize.default_drivers == 0
            || self.optimize.default_drivers > self.optimize.max_drivers
        {
            return Err(ConfigError::ValidationError(format!(
                "optimize.default_drivers must be between 1 and {}",
                self.optimize.max_drivers
            )));
        }
        if PromptLanguage::parse(&self.prompt.language).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "prompt.language must be \"pt\" or \"en\", got \"{}\"",
                self.prompt.language
            )));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if !matches!(self.output.format.as_str(), "text" | "json" | "jsonl") {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be one of text, json, jsonl, got \"{}\"",
                self.output.format
            )));
        }
        Ok(())
    }
}
