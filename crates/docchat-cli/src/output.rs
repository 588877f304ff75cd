//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docchat_domain::{ChatMessage, Document, Role};
use docchat_index::ScoredChunk;
use docchat_rag::QueryOutcome;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const PREVIEW_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the result of a question.
    pub fn format_outcome(&self, outcome: &QueryOutcome, show_context: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_outcome_json(outcome, show_context),
            OutputFormat::Text => Ok(self.format_outcome_text(outcome, show_context)),
        }
    }

    fn format_outcome_text(&self, outcome: &QueryOutcome, show_context: bool) -> String {
        match outcome {
            QueryOutcome::Answered(answer) => {
                let mut out = answer.text.clone();
                if show_context {
                    out.push_str("\n\n");
                    out.push_str(&self.format_context(&answer.retrieved));
                }
                out
            }
            QueryOutcome::NoDocument(message) => self.warning(message),
            QueryOutcome::Failed(_) => self.error(&outcome.message()),
        }
    }

    fn format_outcome_json(&self, outcome: &QueryOutcome, show_context: bool) -> Result<String> {
        let value = match outcome {
            QueryOutcome::Answered(answer) => {
                let mut value = serde_json::json!({
                    "status": "answered",
                    "answer": answer.text,
                });
                if show_context {
                    value["context"] = serde_json::Value::Array(answer.retrieved.iter().map(chunk_json).collect());
                }
                value
            }
            QueryOutcome::NoDocument(message) => serde_json::json!({
                "status": "no_document",
                "message": message,
            }),
            QueryOutcome::Failed(err) => serde_json::json!({
                "status": "error",
                "stage": err.stage().map(|stage| stage.as_str()),
                "message": err.user_message(),
            }),
        };

        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Format retrieved chunks as a table.
    pub fn format_context(&self, retrieved: &[ScoredChunk]) -> String {
        if retrieved.is_empty() {
            return self.colorize("No context retrieved.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Rank", "Chunk", "Chars", "Score", "Preview"]);

        for (rank, scored) in retrieved.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                scored.chunk.index.to_string(),
                format!("{}..{}", scored.chunk.start, scored.chunk.end),
                format!("{:.3}", scored.score),
                preview(&scored.chunk.text),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the chat history.
    pub fn format_history(&self, history: &[ChatMessage]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(history)?),
            OutputFormat::Text => Ok(self.format_history_table(history)),
        }
    }

    fn format_history_table(&self, history: &[ChatMessage]) -> String {
        if history.is_empty() {
            return self.colorize("No messages yet.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Role", "Message"]);

        for (i, message) in history.iter().enumerate() {
            builder.push_record([(i + 1).to_string(), message.role.as_str().to_string(), message.content.clone()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a chat message for the REPL transcript.
    pub fn format_message(&self, message: &ChatMessage) -> String {
        match message.role {
            Role::Assistant => format!("{} {}", self.colorize("assistant:", "cyan"), message.content),
            Role::User => format!("{} {}", self.colorize("you:", "magenta"), message.content),
        }
    }

    /// Format a successfully loaded document.
    pub fn document_loaded(&self, document: &Document) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "status": "loaded",
                "document": document.name(),
                "characters": document.char_count(),
                "pages": document.page_count(),
            }))?),
            OutputFormat::Text => {
                let pages = document
                    .page_count()
                    .map(|pages| format!(", {} pages", pages))
                    .unwrap_or_default();
                Ok(self.success(&format!(
                    "Loaded {} ({} characters{})",
                    document.name(),
                    document.char_count(),
                    pages
                )))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn chunk_json(scored: &ScoredChunk) -> serde_json::Value {
    serde_json::json!({
        "index": scored.chunk.index,
        "start": scored.chunk.start,
        "end": scored.chunk.end,
        "score": scored.score,
        "text": scored.chunk.text,
    })
}

/// First characters of a chunk on one line.
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}
