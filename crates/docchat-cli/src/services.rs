//! Model service construction from configuration.

use crate::config::{Config, EmbedderKind, GeneratorKind, ModelSettings};
use crate::error::Result;
use docchat_domain::{Embedder, LlmProvider};
use docchat_index::HashEmbedder;
use docchat_llm::{groq, GroqProvider, OllamaEmbedder, OllamaProvider};
use docchat_rag::Session;
use tracing::{debug, warn};

/// Session type used by the front end; backends are chosen at runtime.
pub type ChatSession = Session<Box<dyn Embedder>, Box<dyn LlmProvider>>;

/// Build the configured embedder.
pub fn build_embedder(models: &ModelSettings) -> Result<Box<dyn Embedder>> {
    let embedder: Box<dyn Embedder> = match models.embedder {
        EmbedderKind::Hash => Box::new(HashEmbedder::new(models.embedding_dimension)),
        EmbedderKind::Ollama => Box::new(OllamaEmbedder::new(
            &models.ollama_endpoint,
            &models.embedding_model,
            models.embedding_dimension,
            models.http_settings(),
        )?),
    };
    debug!("Embedder: {}", embedder.model_id());
    Ok(embedder)
}

/// Build the configured answer generator.
pub fn build_generator(models: &ModelSettings) -> Result<Box<dyn LlmProvider>> {
    let model = models.generator_model();
    let generator: Box<dyn LlmProvider> = match models.provider {
        GeneratorKind::Groq => Box::new(GroqProvider::from_env(model, models.http_settings())?),
        GeneratorKind::Ollama => Box::new(OllamaProvider::new(
            &models.ollama_endpoint,
            model,
            models.http_settings(),
        )?),
    };
    debug!("Generator: {}", generator.model_name());
    Ok(generator)
}

/// Build a session with the configured services.
pub fn build_session(config: &Config) -> Result<ChatSession> {
    let embedder = build_embedder(&config.models)?;
    let generator = build_generator(&config.models)?;
    Ok(Session::new(embedder, generator, &config.retrieval)?)
}

/// Whether the Groq key is needed but absent.
pub fn missing_groq_key(models: &ModelSettings) -> bool {
    if models.provider != GeneratorKind::Groq {
        return false;
    }

    let missing = std::env::var(groq::API_KEY_VAR)
        .map(|key| key.trim().is_empty())
        .unwrap_or(true);
    if missing {
        warn!("{} is not set; questions will fail until it is", groq::API_KEY_VAR);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedder_uses_configured_dimension() {
        let models = ModelSettings {
            embedding_dimension: 64,
            ..ModelSettings::default()
        };
        let embedder = build_embedder(&models).unwrap();
        assert_eq!(embedder.dimension(), 64);
    }

    #[test]
    fn test_ollama_generator_model_name() {
        let models = ModelSettings {
            provider: GeneratorKind::Ollama,
            model: Some("mistral".into()),
            ..ModelSettings::default()
        };
        let generator = build_generator(&models).unwrap();
        assert_eq!(generator.model_name(), "mistral");
    }

    #[test]
    fn test_ollama_never_needs_groq_key() {
        let models = ModelSettings {
            provider: GeneratorKind::Ollama,
            ..ModelSettings::default()
        };
        assert!(!missing_groq_key(&models));
    }

    #[test]
    fn test_session_starts_with_greeting() {
        let models = ModelSettings {
            provider: GeneratorKind::Ollama,
            ..ModelSettings::default()
        };
        let config = Config {
            models,
            ..Config::default()
        };
        let session = build_session(&config).unwrap();
        assert_eq!(session.history().len(), 1);
    }
}
