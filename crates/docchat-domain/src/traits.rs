//! Trait definitions for the model services
//!
//! These traits define the boundaries between the pipeline and the model
//! backends. Implementations live in `docchat-index` (local embedder) and
//! `docchat-llm` (HTTP providers and test doubles). They are injected into
//! the session controller instead of being created as globals.

use crate::error::{EmbeddingError, GenerationError};
use async_trait::async_trait;

/// Maps text to fixed-size numeric vectors
///
/// The same instance must embed both the chunks and the query; vectors from
/// different models are not comparable.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single string
    ///
    /// An empty string yields a zero vector of `dimension()` length instead of
    /// an error, so a degenerate document never crashes retrieval.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed many strings, one vector per input in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of every vector this embedder produces
    fn dimension(&self) -> usize;

    /// Identifier of the model and version, for logging
    fn model_id(&self) -> &str;
}

/// Sends a prompt to a language model and returns its text response
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model name, for logging
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Box<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

#[async_trait]
impl<T: LlmProvider + ?Sized> LlmProvider for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_id(&self) -> &str {
            "length"
        }
    }

    #[tokio::test]
    async fn test_default_embed_batch_keeps_order() {
        let embedder = LengthEmbedder;
        let texts = vec!["a".to_string(), "abc".to_string(), "ab".to_string()];
        let vectors = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0][0], 1.0);
        assert_eq!(vectors[1][0], 3.0);
        assert_eq!(vectors[2][0], 2.0);
    }

    #[tokio::test]
    async fn test_boxed_embedder_delegates() {
        let embedder: Box<dyn Embedder> = Box::new(LengthEmbedder);

        assert_eq!(embedder.dimension(), 2);
        assert_eq!(embedder.model_id(), "length");
        assert_eq!(embedder.embed("abcd").await.unwrap(), vec![4.0, 1.0]);
    }
}
