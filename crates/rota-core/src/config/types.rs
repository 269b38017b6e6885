//! Sub-configuration structs and their defaults.

use serde::{Deserialize, Serialize};

/// Gemini API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Ask the model to ground its answer in Google Maps data
    pub grounding: bool,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: "${GEMINI_API_KEY}".to_string(),
            grounding: true,
            timeout_secs: 120,
        }
    }
}

/// Route request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Number of drivers when none is given on the command line
    pub default_drivers: u32,

    /// Largest driver count accepted
    pub max_drivers: u32,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            default_drivers: 2,
            max_drivers: 10,
        }
    }
}

/// Instruction text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Prompt language: "pt" or "en"
    pub language: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            language: "pt".to_string(),
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text", "json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Stored credential settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Credential file override. Defaults to `credentials.toml` next to the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
