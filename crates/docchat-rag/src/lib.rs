//! docchat Retrieval Pipeline
//!
//! Answers questions about a single loaded document with
//! retrieval-augmented generation.
//!
//! ## Flow
//!
//! 1. [`Session::load_document`] extracts an upload into a [`Document`](docchat_domain::Document)
//! 2. [`Session::ask`] runs the [`QueryPipeline`] for each question:
//!    chunk, embed, index, retrieve, compose, generate
//! 3. The question and answer are appended to the session's history
//!
//! Model services are injected into the session; nothing is global.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunking;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod session;

pub use chunking::{ChunkerConfig, TextChunker};
pub use config::RagConfig;
pub use error::{RagError, EMPTY_DOCUMENT_MESSAGE};
pub use pipeline::{Answer, QueryPipeline, Stage};
pub use prompt::PromptComposer;
pub use session::{QueryOutcome, Session, SessionState, GREETING, NO_DOCUMENT_MESSAGE};
