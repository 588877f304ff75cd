//! docchat LLM Provider Layer
//!
//! Model backends for the document chat pipeline.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` and `Embedder`
//! traits from `docchat-domain`. HTTP providers share one client setup and
//! one retry policy ([`HttpSettings`]): transient failures are retried with
//! exponential backoff, rate limits and credential errors are not.
//!
//! # Providers
//!
//! - `GroqProvider`: hosted chat completions (default `llama-3.1-8b-instant`)
//! - `OllamaProvider`: local Ollama API integration
//! - `OllamaEmbedder`: local embeddings through Ollama
//! - `MockProvider`: deterministic mock for testing

#![warn(missing_docs)]

pub mod groq;
mod http;
mod mock;
pub mod ollama;

pub use groq::GroqProvider;
pub use http::{HttpSettings, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
pub use mock::MockProvider;
pub use ollama::{OllamaEmbedder, OllamaProvider};
