//! Core TextExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::format::DocumentFormat;
use crate::pdf::extract_pdf;
use crate::upload::Upload;
use docchat_domain::Document;
use std::path::Path;
use tracing::info;

/// Converts an upload into a single plain-text [`Document`]
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Create a new TextExtractor
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractionError> {
        config.validate().map_err(ExtractionError::Config)?;
        Ok(Self { config })
    }

    /// Accept a file on disk as an upload, honouring `max_file_bytes`
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Upload, ExtractionError> {
        Upload::from_path_limited(path, self.config.max_file_bytes)
    }

    /// Extract the text of an upload
    ///
    /// Consumes the upload: its temp file is removed when this returns, on
    /// success and on every error path.
    pub fn extract(&self, upload: Upload) -> Result<Document, ExtractionError> {
        if upload.size() > self.config.max_file_bytes {
            return Err(ExtractionError::TooLarge(upload.size(), self.config.max_file_bytes));
        }

        let bytes = upload.read_bytes()?;

        let document = match upload.format() {
            DocumentFormat::Pdf => {
                let pdf = extract_pdf(&bytes, self.config.pdf_fallback)?;
                Document::new(upload.name(), pdf.text, Some(pdf.page_count))
            }
            DocumentFormat::PlainText => {
                Document::new(upload.name(), decode_text(bytes)?, None)
            }
        };

        info!(
            "Extracted {} characters from '{}' ({})",
            document.char_count(),
            document.name(),
            upload.format()
        );

        Ok(document)
    }

    /// Extract on the blocking thread pool
    ///
    /// PDF parsing is CPU-bound; this keeps it off the async executor.
    pub async fn extract_async(&self, upload: Upload) -> Result<Document, ExtractionError> {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract(upload))
            .await
            .map_err(|e| ExtractionError::Corrupt(format!("extraction task failed: {}", e)))?
    }
}

fn decode_text(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let text = String::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
    Ok(text.replace("\r\n", "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let upload = Upload::from_bytes("notes.txt", b"Line one\r\nLine two").unwrap();
        let doc = TextExtractor::default().extract(upload).unwrap();

        assert_eq!(doc.name(), "notes.txt");
        assert_eq!(doc.text(), "Line one\nLine two");
        assert_eq!(doc.page_count(), None);
    }

    #[test]
    fn test_bom_is_stripped() {
        let upload = Upload::from_bytes("bom.txt", "\u{FEFF}hello".as_bytes()).unwrap();
        let doc = TextExtractor::default().extract(upload).unwrap();
        assert_eq!(doc.text(), "hello");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let upload = Upload::from_bytes("bad.txt", &[0x66, 0x6f, 0xff, 0xfe]).unwrap();
        let result = TextExtractor::default().extract(upload);
        assert!(matches!(result, Err(ExtractionError::InvalidEncoding(_))));
    }

    #[test]
    fn test_size_limit() {
        let extractor = TextExtractor::new(ExtractorConfig {
            max_file_bytes: 4,
            ..ExtractorConfig::default()
        })
        .unwrap();

        let upload = Upload::from_bytes("big.txt", b"too many bytes").unwrap();
        let result = extractor.extract(upload);
        assert!(matches!(result, Err(ExtractionError::TooLarge(14, 4))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = TextExtractor::new(ExtractorConfig {
            max_file_bytes: 0,
            ..ExtractorConfig::default()
        });
        assert!(matches!(result, Err(ExtractionError::Config(_))));
    }

    #[test]
    fn test_extract_async() {
        let upload = Upload::from_bytes("a.md", b"# Title\n\nBody").unwrap();
        let doc = tokio_test::block_on(TextExtractor::default().extract_async(upload)).unwrap();
        assert_eq!(doc.text(), "# Title\n\nBody");
    }
}
