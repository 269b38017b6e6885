//! Error types for Rota.
//!
//! Errors are split by concern: configuration problems, and failures of a
//! single optimization attempt. Every optimization error is terminal for the
//! attempt; nothing in this crate retries on its own.

use thiserror::Error;

/// Substrings in a service error message that mean the credential was refused.
///
/// Matched case-insensitively.
const CREDENTIAL_REJECTION_PATTERNS: &[&str] =
    &["api key not valid", "api_key_invalid", "invalid api key"];

/// Top-level error type for Rota operations.
#[derive(Error, Debug)]
pub enum RotaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A failed optimization attempt
    #[error("Optimization error: {0}")]
    Optimize(#[from] OptimizeError),

    /// Reading or writing the stored credential failed
    #[error("Credential store error: {0}")]
    Credential(String),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of one optimization attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    /// The caller supplied something unusable (driver count, image bytes).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Something required before issuing a request is missing.
    #[error("{0}")]
    Precondition(String),

    /// The service refused the API key.
    #[error("Credential rejected: {0}")]
    CredentialRejected(String),

    /// The model answered, but not with the expected route structure.
    ///
    /// `raw` is the untouched model output, kept for diagnostics.
    #[error("Malformed model response: {reason}")]
    ResponseFormat { reason: String, raw: String },

    /// Any other failure of the network call.
    #[error("{message}")]
    Transport {
        message: String,
        status_code: Option<u16>,
    },
}

impl OptimizeError {
    /// Classify a failure reported by the service.
    ///
    /// Messages that look like a refused credential become
    /// [`OptimizeError::CredentialRejected`]; everything else is a
    /// [`OptimizeError::Transport`] carrying the message verbatim.
    pub fn from_service(message: impl Into<String>, status_code: Option<u16>) -> Self {
        let message = message.into();
        if is_credential_rejection(&message) {
            Self::CredentialRejected(message)
        } else {
            Self::Transport {
                message,
                status_code,
            }
        }
    }

    /// The message shown to a person after this error ends an attempt.
    pub fn user_message(&self) -> String {
        match self {
            Self::CredentialRejected(_) => {
                "Invalid API key. Check the Gemini API key and try again \
                 (`rota key set` stores a new one)."
                    .to_string()
            }
            Self::ResponseFormat { .. } => {
                "Could not generate routes: the AI response was not in the expected format."
                    .to_string()
            }
            Self::InvalidInput(message) | Self::Precondition(message) => message.clone(),
            Self::Transport { message, .. } => message.clone(),
        }
    }

    /// Raw model output attached to a format error, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::ResponseFormat { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Whether a service error message indicates a refused credential.
pub fn is_credential_rejection(message: &str) -> bool {
    let lower = message.to_lowercase();
    CREDENTIAL_REJECTION_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

/// Convenience type alias for Rota results.
pub type Result<T> = std::result::Result<T, RotaError>;

/// Convenience type alias for a single optimization attempt.
pub type OptimizeResult<T> = std::result::Result<T, OptimizeError>;
