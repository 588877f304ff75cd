//! Configuration for the query pipeline

use crate::chunking::ChunkerConfig;
use docchat_index::IndexKind;
use serde::{Deserialize, Serialize};

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between neighbouring chunks in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Default number of chunks retrieved per question
pub const DEFAULT_TOP_K: usize = 4;

/// Configuration for the query pipeline and session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Maximum chunk length (characters)
    pub chunk_size: usize,

    /// Characters shared by neighbouring chunks
    pub chunk_overlap: usize,

    /// Chunks retrieved per question
    pub top_k: usize,

    /// Similarity search backend
    pub index: IndexKind,

    /// Seed new sessions with a greeting from the assistant
    pub greeting: bool,
}

impl RagConfig {
    /// Chunker settings
    pub fn chunker(&self) -> ChunkerConfig {
        ChunkerConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.chunker().validate()?;
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if let IndexKind::Hnsw { ef_search } = self.index {
            if ef_search == 0 {
                return Err("ef_search must be greater than 0".to_string());
            }
        }
        Ok(())
    }

    /// Precise preset: small chunks, more of them
    pub fn precise() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
            top_k: 6,
            ..Self::default()
        }
    }

    /// Broad preset: large chunks for long-form answers
    pub fn broad() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 400,
            top_k: 3,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            index: IndexKind::Exact,
            greeting: false,
        }
    }
}
