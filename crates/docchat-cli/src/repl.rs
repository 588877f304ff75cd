//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Anything that is not a command is asked as a question about the loaded
//! document.

use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::ChatSession;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl(session: &mut ChatSession, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = match session.document() {
            Some(document) => format!("docchat [{}]> ", document.name()),
            None => "docchat> ".to_string(),
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(command) => {
                        if let Err(e) = execute_repl_command(command, session, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Print messages already in the session, such as the greeting.
pub fn print_transcript(session: &ChatSession, formatter: &Formatter) {
    for message in session.history() {
        println!("{}", formatter.format_message(message));
    }
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Load(PathBuf),
    History,
    Document,
    Ask { question: String, show_context: bool },
}

/// Parse a REPL line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "exit" | "quit" | "q" if rest.is_empty() => Ok(ReplCommand::Exit),
        "help" | "?" if rest.is_empty() => Ok(ReplCommand::Help),
        "history" if rest.is_empty() => Ok(ReplCommand::History),
        "doc" | "document" if rest.is_empty() => Ok(ReplCommand::Document),
        "load" | "open" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: load <path>".to_string()));
            }
            Ok(ReplCommand::Load(PathBuf::from(unquote(rest))))
        }
        "context" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: context <question>".to_string()));
            }
            Ok(ReplCommand::Ask {
                question: rest.to_string(),
                show_context: true,
            })
        }
        _ => Ok(ReplCommand::Ask {
            question: line.to_string(),
            show_context: false,
        }),
    }
}

/// Execute a REPL command.
async fn execute_repl_command(command: ReplCommand, session: &mut ChatSession, formatter: &Formatter) -> Result<()> {
    match command {
        ReplCommand::Load(path) => {
            commands::load_file(session, &path, formatter).await?;
        }
        ReplCommand::History => {
            println!("{}", formatter.format_history(session.history())?);
        }
        ReplCommand::Document => match session.document() {
            Some(document) => println!("{}", formatter.document_loaded(document)?),
            None => println!("{}", formatter.warning(docchat_rag::NO_DOCUMENT_MESSAGE)),
        },
        ReplCommand::Ask { question, show_context } => {
            commands::answer(session, &question, formatter, show_context).await?;
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

/// Strip one pair of matching quotes around a path.
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let docchat_dir = home.join(".docchat");
    std::fs::create_dir_all(&docchat_dir)?;
    Ok(docchat_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  load <path>           - Load a PDF, .txt or .md document");
    println!("  doc                   - Show the loaded document");
    println!("  history               - Show the chat history");
    println!("  context <question>    - Ask and show the retrieved chunks");
    println!("  <question>            - Ask about the loaded document");
    println!("  help, ?               - Show this help");
    println!("  exit, quit, q         - Exit REPL");
    println!();
}
