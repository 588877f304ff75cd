//! The per-question retrieval pipeline
//!
//! Every question runs the same fixed sequence of stages against the
//! current document:
//!
//! ```text
//! Chunk -> Embed -> Index -> Retrieve -> Compose -> Generate
//! ```
//!
//! The index is rebuilt from scratch for each question. An empty chunk
//! sequence stops the run at the index stage with [`IndexError::Empty`],
//! before the generator is called.

use crate::chunking::TextChunker;
use crate::config::RagConfig;
use crate::error::RagError;
use crate::prompt::PromptComposer;
use docchat_domain::{Chunk, Document, Embedder, LlmProvider};
use docchat_index::{IndexError, IndexKind, ScoredChunk, VectorIndex};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// A named pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Split the document into chunks
    Chunk,
    /// Embed chunks and question
    Embed,
    /// Build the similarity index
    Index,
    /// Search the index for the question
    Retrieve,
    /// Build the grounded prompt
    Compose,
    /// Call the answer generator
    Generate,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 6] = [
        Stage::Chunk,
        Stage::Embed,
        Stage::Index,
        Stage::Retrieve,
        Stage::Compose,
        Stage::Generate,
    ];

    /// Lowercase stage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Chunk => "chunk",
            Stage::Embed => "embed",
            Stage::Index => "index",
            Stage::Retrieve => "retrieve",
            Stage::Compose => "compose",
            Stage::Generate => "generate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Generated answer text
    pub text: String,
    /// Chunks used as context, in rank order
    pub retrieved: Vec<ScoredChunk>,
    /// The exact prompt sent to the generator
    pub prompt: String,
}

/// Chunk, index, retrieve, compose and generate for one question
#[derive(Debug, Clone)]
pub struct QueryPipeline {
    chunker: TextChunker,
    composer: PromptComposer,
    top_k: usize,
    index: IndexKind,
}

impl QueryPipeline {
    /// Create a pipeline from validated settings
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        config.validate().map_err(RagError::Configuration)?;
        let chunker = TextChunker::new(config.chunker()).map_err(RagError::Configuration)?;

        Ok(Self {
            chunker,
            composer: PromptComposer::new(),
            top_k: config.top_k,
            index: config.index,
        })
    }

    /// Replace the prompt composer
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Chunks retrieved per question
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Stage 1: split the document
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.chunker.chunk(document.text())
    }

    /// Stages 2-4: embed the chunks, build the index and search it
    pub async fn retrieve<E>(
        &self,
        chunks: Vec<Chunk>,
        question: &str,
        embedder: &E,
    ) -> Result<Vec<ScoredChunk>, RagError>
    where
        E: Embedder + ?Sized,
    {
        if chunks.is_empty() {
            return Err(RagError::Index {
                stage: Stage::Index,
                source: IndexError::Empty,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        let query = embedder.embed(question).await?;
        debug!(
            "[{}] {} chunk vectors from {}",
            Stage::Embed,
            vectors.len(),
            embedder.model_id()
        );

        let index = VectorIndex::build_with(chunks, vectors, self.index).map_err(|source| RagError::Index {
            stage: Stage::Index,
            source,
        })?;

        let retrieved = index.search(&query, self.top_k).map_err(|source| RagError::Index {
            stage: Stage::Retrieve,
            source,
        })?;

        debug!(
            "[{}] top {} of {}: {:?}",
            Stage::Retrieve,
            retrieved.len(),
            index.len(),
            retrieved.iter().map(|r| (r.chunk.index, r.score)).collect::<Vec<_>>()
        );

        Ok(retrieved)
    }

    /// Stage 5: build the prompt from retrieved chunks
    pub fn compose(&self, retrieved: &[ScoredChunk], question: &str) -> String {
        let contexts: Vec<&str> = retrieved.iter().map(|r| r.chunk.text.as_str()).collect();
        self.composer.compose(&contexts, question)
    }

    /// Run every stage for one question
    pub async fn run<E, L>(
        &self,
        document: &Document,
        question: &str,
        embedder: &E,
        generator: &L,
    ) -> Result<Answer, RagError>
    where
        E: Embedder + ?Sized,
        L: LlmProvider + ?Sized,
    {
        let started = Instant::now();

        let chunks = self.chunk(document);
        debug!("[{}] {} chunks from '{}'", Stage::Chunk, chunks.len(), document.name());

        let retrieved = self.retrieve(chunks, question, embedder).await?;

        let prompt = self.compose(&retrieved, question);
        debug!("[{}] prompt of {} characters", Stage::Compose, prompt.chars().count());

        let text = generator.generate(&prompt).await?;
        info!(
            "Answered with {} using {} chunks in {:?}",
            generator.model_name(),
            retrieved.len(),
            started.elapsed()
        );

        Ok(Answer {
            text,
            retrieved,
            prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_index::HashEmbedder;
    use docchat_llm::MockProvider;

    fn pipeline() -> QueryPipeline {
        QueryPipeline::new(&RagConfig::default()).unwrap()
    }

    #[test]
    fn test_stage_order_and_names() {
        let names: Vec<&str> = Stage::ALL.iter().map(Stage::as_str).collect();
        assert_eq!(names, vec!["chunk", "embed", "index", "retrieve", "compose", "generate"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RagConfig {
            top_k: 0,
            ..RagConfig::default()
        };
        assert!(matches!(QueryPipeline::new(&config), Err(RagError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_run_sends_composed_prompt() {
        let generator = MockProvider::new("An answer.");
        let document = Document::new("doc.txt", "Rust has no garbage collector.", None);

        let answer = pipeline()
            .run(&document, "Does Rust have a GC?", &HashEmbedder::default(), &generator)
            .await
            .unwrap();

        assert_eq!(answer.text, "An answer.");
        assert_eq!(answer.retrieved.len(), 1);
        assert_eq!(generator.last_prompt(), Some(answer.prompt.clone()));
        assert!(answer.prompt.contains("Rust has no garbage collector."));
    }

    #[tokio::test]
    async fn test_custom_composer_shapes_prompt() {
        let generator = MockProvider::new("An answer.");
        let document = Document::new("doc.txt", "Rust has no garbage collector.", None);
        let composer = PromptComposer::with_template("Context: {context}\nQuestion: {question}").unwrap();

        let answer = pipeline()
            .with_composer(composer)
            .run(&document, "Does Rust have a GC?", &HashEmbedder::default(), &generator)
            .await
            .unwrap();

        assert_eq!(
            answer.prompt,
            "Context: Rust has no garbage collector.\nQuestion: Does Rust have a GC?"
        );
        assert_eq!(generator.last_prompt(), Some(answer.prompt));
    }

    #[tokio::test]
    async fn test_blank_document_stops_before_generation() {
        let generator = MockProvider::default();
        let document = Document::new("blank.txt", "  \n ", None);

        let err = pipeline()
            .run(&document, "Anything?", &HashEmbedder::default(), &generator)
            .await
            .unwrap_err();

        assert!(err.is_empty_document());
        assert_eq!(err.stage(), Some(Stage::Index));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_top_k_limits_context() {
        let config = RagConfig {
            chunk_size: 40,
            chunk_overlap: 5,
            top_k: 2,
            ..RagConfig::default()
        };
        let text = "Paragraph about cats.\n\nParagraph about dogs.\n\nParagraph about birds.\n\nParagraph about fish.";
        let document = Document::new("pets.txt", text, None);
        let pipeline = QueryPipeline::new(&config).unwrap();

        let chunks = pipeline.chunk(&document);
        assert!(chunks.len() > 2);

        let retrieved = pipeline
            .retrieve(chunks, "dogs", &HashEmbedder::default())
            .await
            .unwrap();
        assert_eq!(retrieved.len(), 2);
        assert!(retrieved[0].chunk.text.contains("dogs"));
    }
}
