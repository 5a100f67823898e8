//! Answering model collaborator.
//!
//! The relay treats text generation as an opaque function from a prompt to
//! answer text. The production implementation drives the Vertex AI
//! `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;

/// Trait for answering model providers.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Get the provider name (for logging).
    fn name(&self) -> &'static str;

    /// Generate answer text for a fully assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Default Vertex AI endpoint.
const DEFAULT_VERTEX_URL: &str = "https://aiplatform.googleapis.com";

/// Configuration for the Vertex Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the Vertex API (override for tests).
    pub base_url: String,
    /// Cloud project hosting the model.
    pub project: String,
    /// Model location, e.g. `us-central1`.
    pub location: String,
    /// Model name, e.g. `gemini-2.5-pro`.
    pub model: String,
    /// OAuth bearer token; requests go out unauthenticated without one.
    pub access_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Config for the real Vertex endpoint.
    #[must_use]
    pub fn new(project: &str, location: &str, model: &str) -> Self {
        Self {
            base_url: DEFAULT_VERTEX_URL.to_string(),
            project: project.to_string(),
            location: location.to_string(),
            model: model.to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// Vertex Gemini implementation of [`AnswerProvider`].
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider with the given configuration.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.project,
            self.config.location,
            self.config.model
        )
    }
}

#[async_trait]
impl AnswerProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.config.model, "Requesting generation");

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "generateContent returned {status}: {body}"
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|_| ProviderError::EmptyResponse)?;

        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(ProviderError::EmptyResponse)
    }
}

// =============================================================================
// Vertex API types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
