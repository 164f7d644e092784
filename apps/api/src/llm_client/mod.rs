/// LLM Client — the single point of entry for all Gemini calls in Melodex.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All text generation goes through `TextGenerator`.
///
/// The client returns the raw response envelope without interpretation.
/// Turning it into structured data is the job of `parser`.
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod parser;
#[cfg(test)]
pub mod scripted;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response body is not JSON (status {status}): {source}")]
    NonJsonBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can turn a prompt into a Gemini-style response envelope.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so the workflow can be
/// driven by a scripted generator in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` as the sole content of one request and returns the
    /// decoded envelope, error envelopes included.
    async fn generate(&self, prompt: &str) -> Result<Value, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn single_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

/// Wraps the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, endpoint: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&GenerateRequest::single_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Gemini API returned {}: {}", status, body);
        }

        let envelope: Value =
            serde_json::from_str(&body).map_err(|source| LlmError::NonJsonBody {
                status: status.as_u16(),
                source,
            })?;

        debug!(
            "Gemini call finished: status={}, prompt_chars={}",
            status,
            prompt.chars().count()
        );

        Ok(envelope)
    }
}
