//! Error types for the query pipeline

use crate::pipeline::Stage;
use docchat_domain::{EmbeddingError, GenerationError};
use docchat_extractor::ExtractionError;
use docchat_index::IndexError;
use thiserror::Error;

/// Message shown when the document produced no chunks
pub const EMPTY_DOCUMENT_MESSAGE: &str = "The document appears to be empty or could not be processed.";

/// Errors raised while loading a document or answering a question
#[derive(Error, Debug)]
pub enum RagError {
    /// The upload could not be turned into text
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The embedder failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Building or searching the index failed
    #[error("Index error during {stage}: {source}")]
    Index {
        /// `Index` for build failures, `Retrieve` for search failures
        stage: Stage,
        /// Underlying error
        #[source]
        source: IndexError,
    },

    /// The answer generator failed
    #[error("Generation failed: {0}")]
    Generation(GenerationError),

    /// Invalid settings or missing credentials
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<GenerationError> for RagError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredentials(detail) => RagError::Configuration(detail),
            other => RagError::Generation(other),
        }
    }
}

impl RagError {
    /// Pipeline stage the error came from
    ///
    /// `None` for failures outside a query: extraction and configuration.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RagError::Extraction(_) | RagError::Configuration(_) => None,
            RagError::Embedding(_) => Some(Stage::Embed),
            RagError::Index { stage, .. } => Some(*stage),
            RagError::Generation(_) => Some(Stage::Generate),
        }
    }

    /// Whether this error means the document had nothing to index
    pub fn is_empty_document(&self) -> bool {
        matches!(
            self,
            RagError::Index {
                source: IndexError::Empty,
                ..
            }
        )
    }

    /// One line suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            _ if self.is_empty_document() => EMPTY_DOCUMENT_MESSAGE.to_string(),
            RagError::Extraction(e) => format!("Error processing document: {}", e),
            RagError::Configuration(detail) => format!("Configuration error: {}", detail),
            other => format!("Error during processing: {}", other),
        }
    }
}
