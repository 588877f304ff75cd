//! Loading documents and asking questions, shared by `ask` and the REPL.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use crate::progress::Spinner;
use crate::services::ChatSession;
use docchat_domain::LlmProvider;
use docchat_rag::QueryOutcome;
use std::path::Path;

/// Load a file into the session and report it.
///
/// On failure the session keeps its previous document.
pub async fn load_file(session: &mut ChatSession, path: &Path, formatter: &Formatter) -> Result<()> {
    let spinner = Spinner::start(
        format!("Opening {}...", path.display()),
        formatter.format() == OutputFormat::Text,
    );
    let upload = session.extractor().open(path)?;
    spinner.set_message(format!("Reading {}...", upload.name()));

    let loaded = session.load_document(upload).await;
    spinner.finish();
    loaded?;

    if let Some(document) = session.document() {
        println!("{}", formatter.document_loaded(document)?);
    }
    Ok(())
}

/// Ask a question and print the outcome.
pub async fn answer(
    session: &mut ChatSession,
    question: &str,
    formatter: &Formatter,
    show_context: bool,
) -> Result<QueryOutcome> {
    let spinner = Spinner::start(
        format!("Thinking with {}...", session.generator().model_name()),
        formatter.format() == OutputFormat::Text && session.document().is_some(),
    );
    let outcome = session.ask(question).await;
    spinner.finish();

    let rendered = formatter.format_outcome(&outcome, show_context)?;
    match (&outcome, formatter.format()) {
        (QueryOutcome::Answered(_), _) | (_, OutputFormat::Json) => println!("{}", rendered),
        _ => eprintln!("{}", rendered),
    }

    Ok(outcome)
}
