//! Local Embedding Model for Text Vectorization
//!
//! This module provides an offline, dependency-free embedder so the pipeline
//! works without a model server, and a cosine similarity helper shared by
//! the index backends.
//!
//! # Feature hashing
//!
//! [`HashEmbedder`] lowercases the text, splits it into alphanumeric word
//! tokens and hashes every token into one of `dimension` buckets with a
//! pseudo-random sign. The accumulated vector is L2-normalised. Texts that
//! share words therefore point in similar directions, which is enough for
//! lexical retrieval over a single document. The embeddings are:
//!
//! - **Deterministic**: same text always produces the same vector
//! - **Normalized**: unit length, so cosine similarity is a dot product
//! - **Total**: empty or token-free text yields a zero vector, never an error
//!
//! # Examples
//!
//! ```rust
//! use docchat_index::embedding::HashEmbedder;
//! use docchat_domain::Embedder;
//!
//! # tokio_test::block_on(async {
//! let model = HashEmbedder::new(384);
//! let embedding = model.embed("The sky is blue").await.unwrap();
//! assert_eq!(embedding.len(), 384);
//!
//! // Same text always produces same embedding
//! let embedding2 = model.embed("The sky is blue").await.unwrap();
//! assert_eq!(embedding, embedding2);
//! # });
//! ```

use async_trait::async_trait;
use docchat_domain::{Embedder, EmbeddingError};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Default dimension, matching MiniLM-class sentence models
pub const DEFAULT_DIMENSION: usize = 384;

/// Bumped whenever tokenisation or hashing changes, since vectors from
/// different versions are not comparable
const HASH_MODEL_VERSION: u32 = 1;

/// Feature-hashing embedder
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashEmbedder {
    /// Create a new hashing embedder
    ///
    /// # Parameters
    ///
    /// - `dimension`: number of buckets (vector length). Must be non-zero.
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_id: format!("hash-v{}-{}", HASH_MODEL_VERSION, dimension),
        }
    }

    /// Hash a token with a seed to get a deterministic u64
    fn hash_with_seed(token: &str, seed: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        seed.hash(&mut hasher);
        hasher.finish()
    }

    /// Compute the embedding synchronously
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let bucket = (Self::hash_with_seed(&token, 0) % self.dimension as u64) as usize;
            let sign = if Self::hash_with_seed(&token, 1) & 1 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        normalize(&mut embedding);
        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Lowercase alphanumeric word tokens
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Scale a vector to unit length in place; zero vectors are left as-is
pub fn normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for value in vector.iter_mut() {
            *value /= magnitude;
        }
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// # Returns
///
/// Cosine similarity in range [-1, 1], where:
/// - 1.0 = identical direction
/// - 0.0 = orthogonal, or either vector is all zeros
/// - -1.0 = opposite direction
///
/// Callers must pass vectors of equal length; the index checks dimensions
/// before calling this.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
