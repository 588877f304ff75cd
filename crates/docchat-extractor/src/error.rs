//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while turning an upload into text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// File type is not one the extractor can read
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Upload exceeds the configured size limit
    #[error("File too large: {0} bytes (max: {1})")]
    TooLarge(usize, usize),

    /// Document structure could not be parsed
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// Document is password protected
    #[error("Document is encrypted")]
    Encrypted,

    /// Document parsed but holds no extractable text (e.g. scanned images)
    #[error("No extractable text found in document")]
    NoText,

    /// Plain-text upload is not valid UTF-8
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// Reading or spooling the upload failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::string::FromUtf8Error> for ExtractionError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        ExtractionError::InvalidEncoding(e.to_string())
    }
}
