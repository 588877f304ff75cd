//! HTTP plumbing shared by the providers: client settings, retry with
//! exponential backoff and status-code classification.

use docchat_domain::{EmbeddingError, GenerationError};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default timeout for model requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per request (one retry)
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Connection settings for an HTTP provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HttpSettings {
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts, including the first; values below 1 are treated as 1
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each later one
    pub base_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl HttpSettings {
    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial backoff delay
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub(crate) fn client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.timeout).build()
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Errors that say whether a retry may help
pub(crate) trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for GenerationError {
    fn is_transient(&self) -> bool {
        GenerationError::is_transient(self)
    }
}

impl Transient for EmbeddingError {
    fn is_transient(&self) -> bool {
        matches!(self, EmbeddingError::InferenceFailed(_))
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of attempts
///
/// Backoff: `base_delay`, `2 * base_delay`, `4 * base_delay`, ...
pub(crate) async fn retry_request<F, Fut, T, E>(
    settings: &HttpSettings,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + std::fmt::Display,
{
    let attempts = settings.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempt < attempts => {
                let delay = settings.base_delay * 2u32.saturating_pow(attempt - 1);
                warn!(
                    "Request failed (attempt {}/{}): {}, retrying in {:?}",
                    attempt, attempts, e, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Map a non-success HTTP status to a generation error
pub(crate) fn generation_error(status: StatusCode, body: &str, model: &str) -> GenerationError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimitExceeded,
        StatusCode::NOT_FOUND => GenerationError::ModelNotAvailable(model.to_string()),
        s if s.is_server_error() => {
            GenerationError::Communication(format!("HTTP {}: {}", s, error_detail(body)))
        }
        s => GenerationError::Model(format!("HTTP {}: {}", s, error_detail(body))),
    }
}

/// Map a non-success HTTP status to an embedding error
pub(crate) fn embedding_error(status: StatusCode, body: &str, model: &str) -> EmbeddingError {
    match status {
        StatusCode::NOT_FOUND => EmbeddingError::ModelUnavailable(model.to_string()),
        s if s.is_server_error() => {
            EmbeddingError::InferenceFailed(format!("HTTP {}: {}", s, error_detail(body)))
        }
        s => EmbeddingError::InvalidInput(format!("HTTP {}: {}", s, error_detail(body))),
    }
}

/// Pull a readable message out of an error body
///
/// Understands `{"error": "..."}` (Ollama) and `{"error": {"message": "..."}}`
/// (OpenAI-compatible APIs); anything else is returned trimmed.
fn error_detail(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        let error = value.get("error")?;
        error
            .as_str()
            .or_else(|| error.get("message").and_then(|m| m.as_str()))
            .map(str::to_string)
    });

    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "no response body".to_string(),
        None => body.trim().to_string(),
    }
}
