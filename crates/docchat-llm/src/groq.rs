//! Groq Provider Implementation
//!
//! Talks to Groq's OpenAI-compatible chat completions API. The prompt is sent
//! as a single user message and the first choice's content is returned.
//!
//! The API key is read from `GROQ_API_KEY` by [`GroqProvider::from_env`]. A
//! provider without a key can still be constructed, so the front end can
//! start and warn; every `generate` call then fails with
//! [`GenerationError::MissingCredentials`] without touching the network.

use crate::http::{generation_error, retry_request, HttpSettings};
use async_trait::async_trait;
use docchat_domain::{GenerationError, LlmProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Groq OpenAI-compatible API root
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Groq chat completions provider
pub struct GroqProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    settings: HttpSettings,
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GroqProvider {
    /// Create a provider with an explicit key
    ///
    /// Blank keys are treated as missing.
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        settings: HttpSettings,
    ) -> Result<Self, GenerationError> {
        let client = settings
            .client()
            .map_err(|e| GenerationError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
            settings,
        })
    }

    /// Create a provider with the key from `GROQ_API_KEY`
    pub fn from_env(model: impl Into<String>, settings: HttpSettings) -> Result<Self, GenerationError> {
        Self::new(std::env::var(API_KEY_VAR).ok(), model, settings)
    }

    /// Point at a different OpenAI-compatible API root
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether an API key is configured
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete_once(&self, url: &str, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(generation_error(status, &body, &self.model));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("Response contained no choices".to_string()))
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::MissingCredentials(format!("{} is not set", API_KEY_VAR)))?;

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Groq chat completion: model={}, prompt_chars={}", self.model, prompt.chars().count());

        retry_request(&self.settings, || self.complete_once(&url, api_key, prompt)).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
