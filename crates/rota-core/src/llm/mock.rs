//! Configurable mock provider shared by optimizer and session tests.

use super::provider::{LlmProvider, LlmResponse};
use crate::error::OptimizeError;
use crate::request::RouteRequest;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Each call to `generate()` invokes the response factory; the last request
/// seen is kept for assertions.
pub(crate) struct MockProvider {
    response_fn: Box<dyn Fn() -> Result<LlmResponse, OptimizeError> + Send + Sync>,
    call_count: Arc<AtomicU32>,
    last_request: Arc<Mutex<Option<RouteRequest>>>,
}

impl MockProvider {
    pub(crate) fn answering(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move || {
            Ok(LlmResponse {
                text: Some(text.clone()),
                model: "mock-v1".to_string(),
                tokens_used: Some(42),
                latency_ms: 10,
                ..LlmResponse::default()
            })
        })
    }

    pub(crate) fn silent() -> Self {
        Self::from_fn(|| {
            Ok(LlmResponse {
                text: None,
                model: "mock-v1".to_string(),
                ..LlmResponse::default()
            })
        })
    }

    pub(crate) fn failing(err: OptimizeError) -> Self {
        Self::from_fn(move || Err(err.clone()))
    }

    fn from_fn(
        f: impl Fn() -> Result<LlmResponse, OptimizeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            response_fn: Box::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle to the call counter (clone before moving the provider).
    pub(crate) fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    /// Shared handle to the last request received.
    pub(crate) fn last_request_handle(&self) -> Arc<Mutex<Option<RouteRequest>>> {
        self.last_request.clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-v1"
    }

    async fn generate(&self, request: &RouteRequest) -> Result<LlmResponse, OptimizeError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        (self.response_fn)()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
