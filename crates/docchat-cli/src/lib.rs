//! docchat CLI library.
//!
//! Terminal front end for the document chat pipeline: configuration,
//! model service selection, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod repl;
pub mod services;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use services::ChatSession;
