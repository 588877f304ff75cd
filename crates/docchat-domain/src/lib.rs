//! docchat Domain Layer
//!
//! Core data model and service boundaries for the document chat pipeline.
//! Every other crate in the workspace depends on this one; it depends on
//! nothing in the workspace.
//!
//! ## Key Concepts
//!
//! - **Document**: the plain text extracted from one uploaded file
//! - **Chunk**: a bounded, overlapping span of a document used as the retrieval unit
//! - **Chat message**: a role-tagged entry in the append-only session history
//! - **Embedder / LlmProvider**: the two model services the pipeline calls out to
//!
//! ## Architecture
//!
//! - Pure data types and trait definitions only
//! - Model and storage implementations live in other crates
//! - Errors shared across provider crates are defined here so the
//!   session controller can attribute failures without knowing the backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod chunk;
pub mod document;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use chat::{ChatHistory, ChatMessage, Role};
pub use chunk::Chunk;
pub use document::Document;
pub use error::{EmbeddingError, GenerationError};
pub use traits::{Embedder, LlmProvider};
