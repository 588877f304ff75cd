//! CLI command definitions and argument parsing.

use crate::config::{Config, EmbedderKind, GeneratorKind, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docchat - Ask questions about a PDF or text document.
#[derive(Debug, Parser)]
#[command(name = "docchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer generator
    #[arg(short, long, value_enum, global = true)]
    pub provider: Option<ProviderArg>,

    /// Generator model name
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Embedding backend
    #[arg(long, value_enum, global = true)]
    pub embedder: Option<EmbedderArg>,

    /// Ollama API root
    #[arg(long, env = "OLLAMA_HOST", global = true)]
    pub ollama_host: Option<String>,

    /// Chunks retrieved per question
    #[arg(short = 'k', long, global = true)]
    pub top_k: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Plain text (default)
    Text,
    /// JSON format
    Json,
}

/// Answer generator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Groq hosted API (needs GROQ_API_KEY)
    Groq,
    /// Local Ollama server
    Ollama,
}

/// Embedding backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EmbedderArg {
    /// Local hashing embedder
    Hash,
    /// Ollama embeddings
    Ollama,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer one question about a document
    Ask(AskArgs),

    /// Chat about a document interactively
    Chat(ChatArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Document to load (.pdf, .txt or .md)
    #[arg(short = 'F', long)]
    pub file: PathBuf,

    /// Question about the document
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Print the retrieved chunks after the answer
    #[arg(long)]
    pub show_context: bool,
}

impl AskArgs {
    /// Question words joined back into one string.
    pub fn question_text(&self) -> String {
        self.question.join(" ")
    }
}

/// Arguments for the chat command.
#[derive(Debug, Default, Parser)]
pub struct ChatArgs {
    /// Document to load before the first prompt
    #[arg(short = 'F', long)]
    pub file: Option<PathBuf>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(format) = self.format {
            config.settings.format = format.into();
        }
        if self.no_color {
            config.settings.color = false;
        }
        if let Some(provider) = self.provider {
            config.models.provider = provider.into();
        }
        if let Some(model) = &self.model {
            config.models.model = Some(model.clone());
        }
        if let Some(embedder) = self.embedder {
            config.models.embedder = embedder.into();
        }
        if let Some(host) = &self.ollama_host {
            config.models.ollama_endpoint = normalize_host(host);
        }
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }
    }
}

/// `OLLAMA_HOST` may omit the scheme, as the Ollama tools accept.
fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl From<ProviderArg> for GeneratorKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Groq => GeneratorKind::Groq,
            ProviderArg::Ollama => GeneratorKind::Ollama,
        }
    }
}

impl From<EmbedderArg> for EmbedderKind {
    fn from(embedder: EmbedderArg) -> Self {
        match embedder {
            EmbedderArg::Hash => EmbedderKind::Hash,
            EmbedderArg::Ollama => EmbedderKind::Ollama,
        }
    }
}
