//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local model API, for both answer
//! generation (`/api/generate`) and embeddings (`/api/embeddings`).
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff for transient failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use docchat_llm::{HttpSettings, OllamaProvider};
//! use docchat_domain::LlmProvider;
//!
//! # async fn run() -> Result<(), docchat_domain::GenerationError> {
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1", HttpSettings::default())?;
//! let answer = provider.generate("Say 'hello' and nothing else").await?;
//! # Ok(())
//! # }
//! ```

use crate::http::{embedding_error, generation_error, retry_request, HttpSettings};
use async_trait::async_trait;
use docchat_domain::{Embedder, EmbeddingError, GenerationError, LlmProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default embedding model (MiniLM-L6-v2)
pub const DEFAULT_EMBED_MODEL: &str = "all-minilm";

/// Vector length of [`DEFAULT_EMBED_MODEL`]
pub const DEFAULT_EMBED_DIMENSION: usize = 384;

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

fn trim_endpoint(endpoint: impl Into<String>) -> String {
    endpoint.into().trim_end_matches('/').to_string()
}

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    settings: HttpSettings,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    /// - `settings`: timeout and retry behaviour
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        settings: HttpSettings,
    ) -> Result<Self, GenerationError> {
        let client = settings
            .client()
            .map_err(|e| GenerationError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: trim_endpoint(endpoint),
            model: model.into(),
            client,
            settings,
        })
    }

    /// Create a new Ollama provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, GenerationError> {
        Self::new(DEFAULT_ENDPOINT, model, HttpSettings::default())
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate_once(&self, url: &str, prompt: &str) -> Result<String, GenerationError> {
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GenerationError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(generation_error(status, &body, &self.model));
        }

        response
            .json::<OllamaGenerateResponse>()
            .await
            .map(|r| r.response)
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running (`Communication`, retried)
    /// - Model is not available (`ModelNotAvailable`)
    /// - Response format is invalid (`InvalidResponse`)
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!("Ollama generate: model={}, prompt_chars={}", self.model, prompt.chars().count());

        retry_request(&self.settings, || self.generate_once(&url, prompt)).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Embedder backed by Ollama's embeddings endpoint
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    model_id: String,
    dimension: usize,
    client: reqwest::Client,
    settings: HttpSettings,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    ///
    /// `dimension` is the vector length the model is expected to return;
    /// responses of any other length are rejected.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        settings: HttpSettings,
    ) -> Result<Self, EmbeddingError> {
        let client = settings
            .client()
            .map_err(|e| EmbeddingError::ModelUnavailable(format!("Failed to build HTTP client: {}", e)))?;
        let model = model.into();

        Ok(Self {
            endpoint: trim_endpoint(endpoint),
            model_id: format!("ollama/{}", model),
            model,
            dimension,
            client,
            settings,
        })
    }

    /// MiniLM embedder against `http://localhost:11434`
    pub fn default_endpoint() -> Result<Self, EmbeddingError> {
        Self::new(
            DEFAULT_ENDPOINT,
            DEFAULT_EMBED_MODEL,
            DEFAULT_EMBED_DIMENSION,
            HttpSettings::default(),
        )
    }

    async fn embed_once(&self, url: &str, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::ModelUnavailable(format!("Embedding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(embedding_error(status, &body, &self.model));
        }

        let embed_response: OllamaEmbedResponse = response.json().await.map_err(|e| {
            EmbeddingError::InferenceFailed(format!("Failed to parse embedding response: {}", e))
        })?;

        Ok(embed_response.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        let embedding = retry_request(&self.settings, || self.embed_once(&url, text)).await?;

        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_settings() -> HttpSettings {
        HttpSettings::default()
            .with_timeout(Duration::from_secs(2))
            .with_base_delay(Duration::ZERO)
    }

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama2", HttpSettings::default()).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:11434");
        assert_eq!(provider.model_name(), "llama2");
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral").unwrap();
        assert_eq!(provider.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(provider.model_name(), "mistral");
    }

    #[test]
    fn test_embedder_metadata() {
        let embedder = OllamaEmbedder::default_endpoint().unwrap();
        assert_eq!(embedder.dimension(), 384);
        assert_eq!(embedder.model_id(), "ollama/all-minilm");
    }

    #[tokio::test]
    async fn test_empty_text_skips_the_model() {
        // Port 1 is never served; an empty string must not reach the network.
        let embedder = OllamaEmbedder::new("http://127.0.0.1:1", "all-minilm", 8, unreachable_settings()).unwrap();
        assert_eq!(embedder.embed("").await.unwrap(), vec![0.0; 8]);
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        let provider = OllamaProvider::new("http://127.0.0.1:1", "llama2", unreachable_settings()).unwrap();

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(GenerationError::Communication(_))));
    }

    // Integration tests (requires running Ollama)
    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3.1").unwrap();
        let response = provider.generate("Say 'hello' and nothing else").await.unwrap();
        assert!(!response.is_empty());
    }

    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_embed_integration() {
        let embedder = OllamaEmbedder::default_endpoint().unwrap();
        let vector = embedder.embed("What is SAM?").await.unwrap();
        assert_eq!(vector.len(), DEFAULT_EMBED_DIMENSION);
    }
}
