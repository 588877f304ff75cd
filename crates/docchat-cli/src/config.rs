//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use docchat_llm::{groq, ollama, HttpSettings, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use docchat_rag::RagConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display settings
    #[serde(default)]
    pub settings: Settings,

    /// Generator and embedder selection
    #[serde(default)]
    pub models: ModelSettings,

    /// Chunking and retrieval
    #[serde(default = "default_retrieval")]
    pub retrieval: RagConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// REPL history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

/// Which service answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// Hosted Groq chat completions
    Groq,
    /// Local Ollama server
    Ollama,
}

/// Which model embeds chunks and questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Local hashing embedder, no network
    Hash,
    /// Ollama embeddings endpoint
    Ollama,
}

/// Model service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Generator backend
    #[serde(default = "default_provider")]
    pub provider: GeneratorKind,

    /// Generator model; the provider's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Ollama API root, shared by the Ollama generator and embedder
    #[serde(default = "default_ollama_endpoint")]
    pub ollama_endpoint: String,

    /// Embedder backend
    #[serde(default = "default_embedder")]
    pub embedder: EmbedderKind,

    /// Ollama embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Vector length of the embedder
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".docchat").join("config.toml"))
    }

    /// Load configuration from the default path or fall back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.retrieval.validate().map_err(CliError::Config)?;

        if self.models.embedding_dimension == 0 {
            return Err(CliError::Config("embedding_dimension must be at least 1".into()));
        }
        if self.models.timeout_secs == 0 {
            return Err(CliError::Config("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

impl ModelSettings {
    /// Generator model, falling back to the provider default.
    pub fn generator_model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, GeneratorKind::Groq) => groq::DEFAULT_MODEL,
            (None, GeneratorKind::Ollama) => DEFAULT_OLLAMA_MODEL,
        }
    }

    /// Timeout and retry policy for HTTP providers.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_retries(self.max_retries)
    }
}

/// Generator model used with Ollama when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            models: ModelSettings::default(),
            retrieval: default_retrieval(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
            history_size: 1000,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            ollama_endpoint: default_ollama_endpoint(),
            embedder: default_embedder(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_retrieval() -> RagConfig {
    RagConfig {
        greeting: true,
        ..RagConfig::default()
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_history_size() -> usize {
    1000
}

fn default_provider() -> GeneratorKind {
    GeneratorKind::Groq
}

fn default_ollama_endpoint() -> String {
    ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_embedder() -> EmbedderKind {
    EmbedderKind::Hash
}

fn default_embedding_model() -> String {
    ollama::DEFAULT_EMBED_MODEL.to_string()
}

fn default_embedding_dimension() -> usize {
    ollama::DEFAULT_EMBED_DIMENSION
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
