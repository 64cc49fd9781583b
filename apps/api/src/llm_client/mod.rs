/// LLM Client: the single point of entry for all text-generation calls in TalentMatch.
///
/// ARCHITECTURAL RULE: No other module may call the model server directly.
/// All LLM interactions MUST go through `TextGenerator`.
///
/// Backend: a locally hosted Ollama-compatible `/api/generate` endpoint.
/// One attempt per call, bounded by `REQUEST_TIMEOUT`. No retries.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

pub mod prompts;

const GENERATE_PATH: &str = "/api/generate";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Sampling parameters are fixed for every call; callers cannot tune them.
const TEMPERATURE: f64 = 0.6;
const TOP_P: f64 = 0.9;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Endpoint and model, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f64,
    top_p: f64,
}

/// Anything that turns a prompt into a raw text completion.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so the matching pipeline
/// can be exercised without a model server.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// HTTP client for the model server.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(config: LlmConfig, timeout: Duration) -> Self {
        let endpoint = format!("{}{}", config.base_url.trim_end_matches('/'), GENERATE_PATH);
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            model: config.model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: SamplingOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(completion_text(&body))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        match self.post_generate(prompt).await {
            Ok(text) => {
                debug!(
                    "LLM call succeeded: model={}, prompt_chars={}, completion_chars={}",
                    self.model,
                    prompt.len(),
                    text.len()
                );
                Ok(text)
            }
            Err(e) => {
                error!("Error calling model server at {}: {e}", self.endpoint);
                Err(e)
            }
        }
    }
}

/// Pulls the string `response` field out of a generate reply.
/// A body without one (or that is not JSON at all) yields an empty completion.
fn completion_text(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("response").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}
