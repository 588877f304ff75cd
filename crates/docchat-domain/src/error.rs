//! Errors raised by the model services

use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// The embedding model could not be reached or is not installed
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// Input the model refuses to embed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),

    /// The model returned a vector of the wrong size
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the embedder was configured with
        expected: usize,
        /// Dimension actually returned
        actual: usize,
    },
}

/// Errors that can occur during answer generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model endpoint
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credentials required by the provider were not supplied
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Generic model-side error
    #[error("Model error: {0}")]
    Model(String),
}

impl GenerationError {
    /// Whether retrying the same request may succeed
    ///
    /// Only communication failures are transient. Rate limits, missing
    /// credentials and model errors surface immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Communication(_))
    }
}
