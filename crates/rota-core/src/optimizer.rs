//! The optimization entry point: build request, call the model, interpret.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{OptimizeError, OptimizeResult};
use crate::input::ImageInput;
use crate::interpret::interpret;
use crate::llm::{LlmProvider, LlmProviderFactory};
use crate::request::{PromptLanguage, RequestBuilder};
use crate::types::OptimizationResult;

/// Turns a delivery-list image into driver routes via an LLM provider.
#[derive(Clone)]
pub struct RouteOptimizer {
    provider: Arc<dyn LlmProvider>,
    builder: RequestBuilder,
}

impl RouteOptimizer {
    pub fn new(provider: Box<dyn LlmProvider>, builder: RequestBuilder) -> Self {
        Self {
            provider: Arc::from(provider),
            builder,
        }
    }

    /// Create an optimizer backed by Gemini, configured from `config`.
    pub fn from_config(config: &Config, model_override: Option<&str>) -> OptimizeResult<Self> {
        let provider = LlmProviderFactory::create("gemini", &config.gemini, model_override)?;
        let language = PromptLanguage::parse(&config.prompt.language).ok_or_else(|| {
            OptimizeError::InvalidInput(format!(
                "unsupported prompt language: {}",
                config.prompt.language
            ))
        })?;
        let builder = RequestBuilder::new(
            language,
            config.optimize.max_drivers,
            config.gemini.grounding,
        );
        Ok(Self::new(provider, builder))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Ask the model for `driver_count` routes covering the list in `image`.
    ///
    /// Fails before any network call if `api_key` is empty or the inputs are
    /// invalid. An empty model answer is a successful result with
    /// `routes: None`.
    pub async fn optimize(
        &self,
        api_key: &str,
        image: ImageInput,
        driver_count: u32,
    ) -> OptimizeResult<OptimizationResult> {
        let request = self.builder.build(api_key, image, driver_count)?;

        tracing::info!(
            "Requesting {} route(s) from {} ({})",
            driver_count,
            self.provider.name(),
            self.provider.model()
        );
        tracing::debug!(
            "Image: {} ({} bytes), grounding: {}",
            request.image.media_type,
            request.image.byte_len,
            request.grounding
        );

        let response = self.provider.generate(&request).await.inspect_err(|e| {
            tracing::warn!("{} call failed: {e}", self.provider.name());
        })?;

        tracing::debug!(
            "Model {} answered in {}ms (tokens: {:?})",
            response.model,
            response.latency_ms,
            response.tokens_used
        );

        interpret(
            response.text.as_deref(),
            response.citations,
            Some(response.model),
        )
    }
}
