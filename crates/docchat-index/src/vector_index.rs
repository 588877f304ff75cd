//! Per-query similarity index over document chunks
//!
//! The index is ephemeral: the session builds one from the current
//! document's chunks for every question and drops it afterwards. Search is
//! delegated to a [`NeighborSearch`] backend; exact brute-force search is
//! the default and an HNSW graph can be selected with [`IndexKind::Hnsw`].
//!
//! Whatever the backend, results follow one ordering contract:
//! descending cosine similarity, ties broken by lower chunk position.

use crate::embedding::cosine_similarity;
use crate::hnsw::HnswIndex;
use docchat_domain::Chunk;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during vector index operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Nothing to index
    #[error("Cannot build an index from zero chunks")]
    Empty,

    /// Chunks and vectors do not pair up
    #[error("Got {chunks} chunks but {vectors} vectors")]
    LengthMismatch {
        /// Number of chunks supplied
        chunks: usize,
        /// Number of vectors supplied
        vectors: usize,
    },

    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Backend failure
    #[error("Index error: {0}")]
    Internal(String),
}

/// Which search backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexKind {
    /// Brute-force cosine similarity over every vector
    #[default]
    Exact,
    /// Approximate search over an HNSW graph
    Hnsw {
        /// Candidate list size at query time
        ef_search: usize,
    },
}

impl IndexKind {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Exact => "exact",
            IndexKind::Hnsw { .. } => "hnsw",
        }
    }
}

/// A search hit: position in the indexed sequence and its similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the vector in insertion order
    pub position: usize,
    /// Cosine similarity to the query
    pub score: f32,
}

/// Nearest-neighbour backend
///
/// Implementations return at most `k` neighbours ordered by [`rank`].
pub trait NeighborSearch: Send + Sync {
    /// Find the `k` vectors most similar to `query`
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError>;

    /// Number of indexed vectors
    fn len(&self) -> usize;

    /// Whether the backend holds no vectors
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordering used by every backend: higher score first, then lower position
///
/// NaN scores sort last. The order is total, so sorting never panics.
pub fn rank(a: &Neighbor, b: &Neighbor) -> Ordering {
    rank_key(b.score)
        .total_cmp(&rank_key(a.score))
        .then_with(|| a.position.cmp(&b.position))
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        // folds -0.0 into 0.0
        score + 0.0
    }
}

/// Exact search by scoring every vector
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Wrap a set of vectors; positions are their order here
    pub fn new(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }
}

impl NeighborSearch for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let mut scored: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| Neighbor {
                position,
                score: cosine_similarity(query, vector),
            })
            .collect();

        scored.sort_by(rank);
        scored.truncate(k);
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

/// A chunk returned by [`VectorIndex::search`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query
    pub score: f32,
}

/// Chunks paired with their embeddings, searchable by query vector
///
/// # Examples
///
/// ```rust
/// use docchat_domain::Chunk;
/// use docchat_index::VectorIndex;
///
/// let chunks = vec![
///     Chunk::new(0, 0, 5, "north"),
///     Chunk::new(1, 5, 10, "east"),
/// ];
/// let vectors = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
/// let index = VectorIndex::build(chunks, vectors).unwrap();
///
/// let hits = index.search(&[0.9, 0.1], 1).unwrap();
/// assert_eq!(hits[0].chunk.text, "east");
/// ```
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    dimension: usize,
    kind: IndexKind,
    backend: Box<dyn NeighborSearch>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("chunks", &self.chunks.len())
            .field("dimension", &self.dimension)
            .field("kind", &self.kind)
            .finish()
    }
}

impl VectorIndex {
    /// Build an exact index
    ///
    /// # Errors
    ///
    /// - `Empty` when there are no chunks
    /// - `LengthMismatch` when chunks and vectors differ in count
    /// - `DimensionMismatch` when the vectors are not all the same length
    pub fn build(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        Self::build_with(chunks, vectors, IndexKind::Exact)
    }

    /// Build an index with the chosen backend
    pub fn build_with(
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
        kind: IndexKind,
    ) -> Result<Self, IndexError> {
        if chunks.len() != vectors.len() {
            return Err(IndexError::LengthMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }
        if chunks.is_empty() {
            return Err(IndexError::Empty);
        }

        let dimension = vectors[0].len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        let backend: Box<dyn NeighborSearch> = match kind {
            IndexKind::Exact => Box::new(FlatIndex::new(vectors)),
            IndexKind::Hnsw { ef_search } => Box::new(HnswIndex::build(vectors, ef_search)?),
        };

        debug!(
            "Built {} index over {} chunks ({} dims)",
            kind.name(),
            chunks.len(),
            dimension
        );

        Ok(Self {
            chunks,
            dimension,
            kind,
            backend,
        })
    }

    /// Return the `min(k, len)` chunks most similar to `query`
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let k = k.min(self.chunks.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let hits = self.backend.search(query, k)?;
        hits.into_iter()
            .map(|hit| {
                self.chunks
                    .get(hit.position)
                    .map(|chunk| ScoredChunk {
                        chunk: chunk.clone(),
                        score: hit.score,
                    })
                    .ok_or_else(|| {
                        IndexError::Internal(format!("backend returned unknown position {}", hit.position))
                    })
            })
            .collect()
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false for a built index
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Backend in use
    pub fn kind(&self) -> IndexKind {
        self.kind
    }
}
