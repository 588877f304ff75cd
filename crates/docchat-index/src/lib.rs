//! docchat Index Layer
//!
//! Local embedding and per-query similarity search for the document chat
//! pipeline.
//!
//! ## Components
//!
//! - [`HashEmbedder`]: offline feature-hashing implementation of
//!   [`docchat_domain::Embedder`]
//! - [`VectorIndex`]: chunks paired with vectors, searched by cosine similarity
//! - [`FlatIndex`] / [`HnswIndex`]: exact and approximate backends behind
//!   [`NeighborSearch`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod embedding;
pub mod hnsw;
pub mod vector_index;

pub use embedding::{cosine_similarity, HashEmbedder, DEFAULT_DIMENSION};
pub use hnsw::HnswIndex;
pub use vector_index::{
    FlatIndex, IndexError, IndexKind, Neighbor, NeighborSearch, ScoredChunk, VectorIndex,
};
