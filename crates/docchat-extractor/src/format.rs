//! Upload format detection

use crate::error::ExtractionError;
use std::fmt;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A document format the extractor can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// UTF-8 text (`.txt`, `.md`)
    PlainText,
}

impl DocumentFormat {
    /// Detect the format from the file name and leading bytes
    ///
    /// The PDF magic number wins over the extension; otherwise the extension
    /// decides. Anything else is rejected.
    pub fn detect(file_name: &str, bytes: &[u8]) -> Result<Self, ExtractionError> {
        if bytes.starts_with(PDF_MAGIC) {
            return Ok(DocumentFormat::Pdf);
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" | "text" | "md" | "markdown" => Ok(DocumentFormat::PlainText),
            "" => Err(ExtractionError::UnsupportedFormat(format!(
                "'{}' has no extension and is not a PDF",
                file_name
            ))),
            other => Err(ExtractionError::UnsupportedFormat(format!(
                ".{} (supported: .pdf, .txt, .md)",
                other
            ))),
        }
    }

    /// Suffix used for the spooled temp file
    pub fn suffix(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::PlainText => ".txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::PlainText => f.write_str("plain text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_beats_extension() {
        let format = DocumentFormat::detect("report.txt", b"%PDF-1.7\n...").unwrap();
        assert_eq!(format, DocumentFormat::Pdf);
    }

    #[test]
    fn test_extension_detection() {
        assert_eq!(DocumentFormat::detect("a.PDF", b"junk").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::detect("notes.md", b"# Hi").unwrap(), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::detect("notes.txt", b"hi").unwrap(), DocumentFormat::PlainText);
    }

    #[test]
    fn test_rejects_unsupported() {
        let err = DocumentFormat::detect("slides.pptx", b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
        assert!(err.to_string().contains(".pptx"));

        let err = DocumentFormat::detect("README", b"plain").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }
}
