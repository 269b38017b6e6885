//! LLM provider trait and response type.
//!
//! Defines the interface the optimizer talks to, plus the factory that
//! creates the configured provider.

use crate::config::GeminiConfig;
use crate::error::OptimizeError;
use crate::request::RouteRequest;
use crate::types::Citation;
use async_trait::async_trait;
use std::time::Duration;

/// The response from one model call.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Generated text, `None` when the model produced no text parts
    pub text: Option<String>,
    /// Grounding citations attached to the answer
    pub citations: Vec<Citation>,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model the provider sends requests to.
    fn model(&self) -> &str;

    /// Send the request and return the raw answer.
    ///
    /// The credential travels inside the request; providers never store it.
    async fn generate(&self, request: &RouteRequest) -> Result<LlmResponse, OptimizeError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Factory that creates the appropriate provider from config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier (currently only "gemini")
    /// * `config` - The Gemini config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &GeminiConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, OptimizeError> {
        match provider {
            "gemini" => {
                let model = model_override
                    .map(String::from)
                    .unwrap_or(config.model.clone());
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &config.endpoint,
                    &model,
                    Duration::from_secs(config.timeout_secs),
                )))
            }
            other => Err(OptimizeError::InvalidInput(format!(
                "Unknown LLM provider: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creates_gemini() {
        let config = GeminiConfig::default();
        let provider = LlmProviderFactory::create("gemini", &config, None).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.5-flash");
        assert_eq!(provider.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_factory_model_override() {
        let config = GeminiConfig::default();
        let provider =
            LlmProviderFactory::create("gemini", &config, Some("gemini-2.5-pro")).unwrap();
        assert_eq!(provider.model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_factory_unknown_provider() {
        let config = GeminiConfig::default();
        let err = LlmProviderFactory::create("openai", &config, None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }
}
