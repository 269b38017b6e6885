//! LLM integration for route generation.
//!
//! Provides a provider abstraction over the model backend (currently Gemini)
//! so the optimizer and session can be driven by a mock in tests.

pub(crate) mod gemini;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod provider;

pub use gemini::GeminiProvider;
pub use provider::{LlmProvider, LlmProviderFactory, LlmResponse};
