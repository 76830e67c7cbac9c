//! provider.rs — generation backends behind one trait.
//!
//! The real backend is the Gemini `generateContent` REST endpoint with the
//! Google Search tool enabled; a deterministic mock serves tests and local
//! runs (`TREND_TEST_MODE=mock`). Grounded calls cannot request a strict
//! machine-validated response format, so backends return raw text and let
//! the acquisition layer do the parsing.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TrendsConfig;
use crate::error::AcquireError;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One `(title, uri)` pair from grounding metadata, pre-deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

/// Outcome of a single generation call.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Free-form model text, expected to contain a fenced JSON block.
    pub text: String,
    /// Pages the backend consulted; empty when metadata is absent.
    pub citations: Vec<Citation>,
}

/// Trait object used by the acquisition layer and tests.
#[async_trait]
pub trait GenerateClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, AcquireError>;
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynGenerateClient = Arc<dyn GenerateClient>;

/// Factory: build a client according to config and environment.
///
/// * If `TREND_TEST_MODE=mock`, returns a deterministic mock client.
/// * Otherwise builds the real Gemini backend.
pub fn build_client_from_config(config: &TrendsConfig) -> DynGenerateClient {
    if env::var("TREND_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockClient::canned());
    }
    if config.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; acquisition will fail with an auth error");
    }
    Arc::new(GeminiClient::new(&config.model, &config.api_key))
}

// ------------------------------------------------------------
// Gemini REST backend
// ------------------------------------------------------------

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(model: &str, api_key: &str) -> Self {
        Self::with_base_url(GEMINI_API_BASE, model, api_key)
    }

    /// `base_url` override for tests against a local stub server.
    pub fn with_base_url(base_url: &str, model: &str, api_key: &str) -> Self {
        // No request timeout: grounded generations routinely run long, so
        // the transport default applies.
        let http = reqwest::Client::builder()
            .user_agent("trendsphere/0.1 (+github.com/trendsphere/trendsphere)")
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// `{"google_search": {}}` — enables web-search grounding.
#[derive(Serialize)]
struct Tool {
    google_search: EmptyObject,
}

#[derive(Serialize)]
struct EmptyObject {}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

fn extract_generation(body: GenerateResponse) -> Generation {
    let Some(candidate) = body.candidates.into_iter().next() else {
        return Generation::default();
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    // Chunks missing either field are skipped; absent metadata is an
    // empty list, never an error.
    let citations = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| {
                    let web = chunk.web?;
                    Some(Citation {
                        title: web.title?,
                        uri: web.uri?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Generation { text, citations }
}

#[async_trait]
impl GenerateClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, AcquireError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let req = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: EmptyObject {},
            }],
        };

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AcquireError::Api {
                status: status.as_u16(),
            });
        }

        let body: GenerateResponse = resp.json().await?;
        let generation = extract_generation(body);
        debug!(
            chars = generation.text.len(),
            citations = generation.citations.len(),
            "gemini response received"
        );
        Ok(generation)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ------------------------------------------------------------
// Mock backend for tests and local runs
// ------------------------------------------------------------

/// Returns a fixed generation; never touches the network.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl MockClient {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// Deterministic one-trend report used by `TREND_TEST_MODE=mock`.
    pub fn canned() -> Self {
        let text = concat!(
            "Here is today's report.\n",
            "```json\n",
            "{\"date\":\"Mock Day\",\"summary\":\"Mock summary of the day.\",",
            "\"trends\":[{\"id\":\"mock-1\",\"title\":\"Mock trend\",",
            "\"category\":\"AI\",\"summary\":\"A deterministic trend.\",",
            "\"impact\":\"None, it is a mock.\",\"keywords\":[\"mock\"]}]}\n",
            "```\n"
        );
        Self {
            text: text.to_string(),
            citations: vec![Citation {
                title: "Mock source".to_string(),
                uri: "https://example.com/mock".to_string(),
            }],
        }
    }
}

#[async_trait]
impl GenerateClient for MockClient {
    async fn generate(&self, _prompt: &str) -> Result<Generation, AcquireError> {
        Ok(Generation {
            text: self.text.clone(),
            citations: self.citations.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounding_chunks_missing_fields_are_skipped() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "hello "}, {"text": "world"}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"web": {"uri": "https://a", "title": "A"}},
                        {"web": {"uri": "https://b"}},
                        {"web": {"title": "C only"}},
                        {}
                    ]}
                }]
            }"#,
        )
        .unwrap();
        let generation = extract_generation(body);
        assert_eq!(generation.text, "hello world");
        assert_eq!(generation.citations.len(), 1);
        assert_eq!(generation.citations[0].uri, "https://a");
    }

    #[test]
    fn absent_metadata_yields_empty_citations() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"x"}]}}]}"#)
                .unwrap();
        let generation = extract_generation(body);
        assert_eq!(generation.text, "x");
        assert!(generation.citations.is_empty());
    }

    #[test]
    fn empty_candidate_list_yields_default() {
        let body: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        let generation = extract_generation(body);
        assert!(generation.text.is_empty());
        assert!(generation.citations.is_empty());
    }

    #[test]
    fn request_body_names_the_search_tool() {
        let req = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
            tools: vec![Tool {
                google_search: EmptyObject {},
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
