//! Ask command implementation.

use super::document::{answer, load_file};
use crate::cli::AskArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::ChatSession;

/// Execute the ask command.
///
/// Returns whether the question was answered.
pub async fn execute_ask(args: AskArgs, session: &mut ChatSession, formatter: &Formatter) -> Result<bool> {
    let question = args.question_text();
    if question.trim().is_empty() {
        return Err(CliError::InvalidInput("Question must not be empty".to_string()));
    }

    load_file(session, &args.file, formatter).await?;
    let outcome = answer(session, &question, formatter, args.show_context).await?;

    Ok(outcome.is_answered())
}
