//! docchat - chat with a PDF or text document from the terminal.

use clap::Parser;
use docchat_cli::commands;
use docchat_cli::services;
use docchat_cli::{Cli, Command, Config, Formatter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const VERBOSE_FILTER: &str =
    "warn,docchat_cli=debug,docchat_rag=debug,docchat_llm=debug,docchat_index=debug,docchat_extractor=debug";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> docchat_cli::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config from file, then apply flags
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    cli.apply_to(&mut config);
    config.validate()?;

    let formatter = Formatter::new(config.settings.format, config.settings.color);

    match cli.command {
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Ask(args)) => {
            warn_missing_key(&config, &formatter);
            let mut session = services::build_session(&config)?;
            let answered = commands::execute_ask(args, &mut session, &formatter).await?;
            Ok(if answered { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            chat(Default::default(), &config, &formatter).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Chat(args)) => {
            chat(args, &config, &formatter).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn chat(args: docchat_cli::cli::ChatArgs, config: &Config, formatter: &Formatter) -> docchat_cli::Result<()> {
    warn_missing_key(config, formatter);
    let mut session = services::build_session(config)?;
    commands::execute_chat(args, &mut session, config, formatter).await
}

fn warn_missing_key(config: &Config, formatter: &Formatter) {
    if services::missing_groq_key(&config.models) {
        eprintln!(
            "{}",
            formatter.warning("GROQ_API_KEY is not set. Add it to .env or your environment, or use --provider ollama.")
        );
    }
}

/// Initialize tracing (log to stderr); `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { VERBOSE_FILTER } else { "warn" }));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
