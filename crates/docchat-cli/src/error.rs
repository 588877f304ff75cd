//! Error types for the CLI application.

use docchat_domain::{EmbeddingError, GenerationError};
use docchat_extractor::ExtractionError;
use docchat_rag::RagError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline or session error
    #[error("{}", .0.user_message())]
    Rag(#[from] RagError),

    /// Document could not be read
    #[error("Error processing document: {0}")]
    Extraction(#[from] ExtractionError),

    /// Generator could not be constructed
    #[error("Generator error: {0}")]
    Generation(#[from] GenerationError),

    /// Embedder could not be constructed
    #[error("Embedder error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Line editor failure
    #[error("Editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}
