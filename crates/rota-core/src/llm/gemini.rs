//! Gemini provider using the `generateContent` API.
//!
//! Sends the image as an inline data part followed by the instruction text,
//! optionally with the Google Maps grounding tool enabled.

use super::provider::{LlmProvider, LlmResponse};
use crate::error::OptimizeError;
use crate::request::RouteRequest;
use crate::types::{Citation, CitationSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Gemini provider.
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    InlineData(Blob),
    Text(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: GoogleMaps,
}

#[derive(Serialize)]
struct GoogleMaps {}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    model_version: Option<String>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    maps: Option<ChunkRef>,
    web: Option<ChunkRef>,
}

#[derive(Deserialize)]
struct ChunkRef {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn build_body(request: &RouteRequest) -> GenerateContentRequest {
    let tools = if request.grounding {
        vec![Tool {
            google_maps: GoogleMaps {},
        }]
    } else {
        Vec::new()
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                Part::InlineData(Blob {
                    mime_type: request.image.media_type.clone(),
                    data: request.image.data.clone(),
                }),
                Part::Text(request.prompt.clone()),
            ],
        }],
        tools,
    }
}

/// Joined text of the first candidate plus its grounding citations.
fn extract_answer(resp: &GenerateContentResponse) -> (Option<String>, Vec<Citation>) {
    let Some(candidate) = resp.candidates.first() else {
        return (None, Vec::new());
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter(|p| !p.thought)
        .filter_map(|p| p.text.as_deref())
        .collect();
    let text = (!text.is_empty()).then_some(text);

    let citations = candidate
        .grounding_metadata
        .iter()
        .flat_map(|g| g.grounding_chunks.iter())
        .filter_map(|chunk| {
            let (source, r) = match (&chunk.maps, &chunk.web) {
                (Some(r), _) => (CitationSource::Maps, r),
                (None, Some(r)) => (CitationSource::Web, r),
                (None, None) => return None,
            };
            Some(Citation {
                source,
                uri: r.uri.clone(),
                title: r.title.clone(),
            })
        })
        .collect();

    (text, citations)
}

/// Turn a non-success HTTP response into a classified error.
fn service_error(status: reqwest::StatusCode, body: &str) -> OptimizeError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    OptimizeError::from_service(
        format!("Gemini HTTP {status}: {detail}"),
        Some(status.as_u16()),
    )
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &RouteRequest) -> Result<LlmResponse, OptimizeError> {
        let start = Instant::now();
        let body = build_body(request);

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &request.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| OptimizeError::from_service(format!("Gemini request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(service_error(status, &text));
        }

        let gen_resp: GenerateContentResponse =
            resp.json().await.map_err(|e| OptimizeError::Transport {
                message: format!("Failed to parse Gemini response: {e}"),
                status_code: None,
            })?;

        let (text, citations) = extract_answer(&gen_resp);
        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "Gemini answered in {latency_ms}ms ({} citation(s))",
            citations.len()
        );

        Ok(LlmResponse {
            text,
            citations,
            model: gen_resp.model_version.unwrap_or_else(|| self.model.clone()),
            tokens_used: gen_resp.usage_metadata.and_then(|u| u.total_token_count),
            latency_ms,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
