//! Chat command implementation.

use super::document::load_file;
use crate::cli::ChatArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::repl;
use crate::services::ChatSession;

/// Execute the chat command.
///
/// A file that fails to load is reported and the REPL starts without it.
pub async fn execute_chat(
    args: ChatArgs,
    session: &mut ChatSession,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    repl::print_transcript(session, formatter);

    if let Some(path) = args.file {
        if let Err(e) = load_file(session, &path, formatter).await {
            eprintln!("{}", formatter.error(&e.to_string()));
        }
    }

    repl::run_repl(session, config, formatter).await
}
