//! Groq Provider Implementation
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint. Groq is the
//! default host, but any compatible base URL works.
//!
//! # Features
//!
//! - Async HTTP communication with bearer authentication
//! - Fixed sampling parameters
//! - Timeout handling (no retries: one failure is terminal)
//!
//! # Examples
//!
//! ```no_run
//! use folio_llm::GroqProvider;
//!
//! let provider = GroqProvider::default_endpoint("gsk-...").unwrap();
//! ```

use crate::LlmError;
use async_trait::async_trait;
use folio_domain::traits::{ChatMessage, ChatProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 1.0;
const MAX_TOKENS: u32 = 4000;

/// Chat-completion provider for Groq and other OpenAI-compatible APIs
pub struct GroqProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root, e.g. "https://api.groq.com/openai/v1"
    /// - `model`: Model to use, e.g. "llama-3.3-70b-versatile"
    /// - `api_key`: Bearer credential
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Create a provider for the default Groq endpoint and model
    pub fn default_endpoint(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Model this provider sends requests to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

#[async_trait]
impl ChatProvider for GroqProvider {
    type Error = LlmError;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} ({} messages)", url, messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| {
                warn!("LLM request failed: {}", e);
                if e.is_timeout() {
                    LlmError::Timeout(e.to_string())
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("LLM API answered HTTP {}", status);
            return Err(LlmError::Api { status, message });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(e.to_string())
            } else {
                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }
}
