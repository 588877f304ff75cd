//! Command implementations.

pub mod ask;
pub mod chat;
pub mod config;
pub mod document;

pub use self::ask::execute_ask;
pub use self::chat::execute_chat;
pub use self::config::execute_config;
pub use self::document::{answer, load_file};
