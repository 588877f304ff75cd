//! One-shot `ask` against a mock generator

use docchat_cli::cli::AskArgs;
use docchat_cli::commands::execute_ask;
use docchat_cli::config::OutputFormat;
use docchat_cli::{ChatSession, CliError, Formatter};
use docchat_domain::{Embedder, LlmProvider};
use docchat_extractor::{ExtractionError, ExtractorConfig, TextExtractor};
use docchat_index::HashEmbedder;
use docchat_llm::MockProvider;
use docchat_rag::{RagConfig, Session};
use std::fs;
use tempfile::TempDir;

fn session(generator: &MockProvider) -> ChatSession {
    let embedder: Box<dyn Embedder> = Box::new(HashEmbedder::default());
    let generator: Box<dyn LlmProvider> = Box::new(generator.clone());
    Session::new(embedder, generator, &RagConfig::default()).unwrap()
}

fn args(file: std::path::PathBuf, question: &str) -> AskArgs {
    AskArgs {
        file,
        question: question.split_whitespace().map(String::from).collect(),
        show_context: true,
    }
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

#[tokio::test]
async fn test_ask_answers_from_text_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sam.txt");
    fs::write(
        &path,
        "Segment Anything Model (SAM) is an AI model from Meta AI. It was released in 2023.",
    )
    .unwrap();

    let generator = MockProvider::new("SAM is an AI model from Meta AI.");
    let mut session = session(&generator);

    let answered = execute_ask(args(path, "What is SAM?"), &mut session, &formatter())
        .await
        .unwrap();

    assert!(answered);
    assert_eq!(generator.call_count(), 1);
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("It was released in 2023."));
    assert!(prompt.ends_with("What is SAM?"));
}

#[tokio::test]
async fn test_ask_on_blank_file_is_unanswered() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.md");
    fs::write(&path, "   \n\n").unwrap();

    let generator = MockProvider::default();
    let mut session = session(&generator);

    let answered = execute_ask(args(path, "Anything?"), &mut session, &formatter())
        .await
        .unwrap();

    assert!(!answered);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_ask_rejects_unsupported_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("slides.pptx");
    fs::write(&path, b"PK\x03\x04").unwrap();

    let generator = MockProvider::default();
    let mut session = session(&generator);

    let result = execute_ask(args(path, "What is this?"), &mut session, &formatter()).await;

    assert!(matches!(result, Err(CliError::Extraction(_))));
    assert!(session.document().is_none());
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_ask_rejects_blank_question() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sam.txt");
    fs::write(&path, "SAM").unwrap();

    let generator = MockProvider::default();
    let mut session = session(&generator);
    let blank = AskArgs {
        file: path,
        question: vec!["  ".to_string()],
        show_context: false,
    };

    let result = execute_ask(blank, &mut session, &formatter()).await;

    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[tokio::test]
async fn test_ask_rejects_file_over_size_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("long.txt");
    fs::write(&path, "SAM ".repeat(64)).unwrap();

    let generator = MockProvider::default();
    let embedder: Box<dyn Embedder> = Box::new(HashEmbedder::default());
    let boxed: Box<dyn LlmProvider> = Box::new(generator.clone());
    let extractor = TextExtractor::new(ExtractorConfig {
        max_file_bytes: 32,
        ..ExtractorConfig::default()
    })
    .unwrap();
    let mut session = Session::with_extractor(embedder, boxed, extractor, &RagConfig::default()).unwrap();

    let result = execute_ask(args(path, "What is SAM?"), &mut session, &formatter()).await;

    assert!(matches!(
        result,
        Err(CliError::Extraction(ExtractionError::TooLarge(256, 32)))
    ));
    assert!(session.document().is_none());
    assert_eq!(generator.call_count(), 0);
}
