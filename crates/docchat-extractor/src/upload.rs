//! Scoped storage for uploaded files

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::format::DocumentFormat;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// An uploaded file, spooled to a temporary file on disk
///
/// The format is checked at construction, so an `Upload` always holds a
/// file the extractor supports. The temp file is deleted when the `Upload`
/// is dropped.
#[derive(Debug)]
pub struct Upload {
    name: String,
    format: DocumentFormat,
    size: usize,
    file: NamedTempFile,
}

impl Upload {
    /// Accept an upload from raw bytes
    ///
    /// # Errors
    ///
    /// - `UnsupportedFormat` if the name/bytes are not a PDF or text file
    /// - `Io` if the temp file cannot be written
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, ExtractionError> {
        let name = name.into();
        let format = DocumentFormat::detect(&name, bytes)?;

        let mut file = tempfile::Builder::new()
            .prefix("docchat-upload-")
            .suffix(format.suffix())
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        debug!(
            "Spooled upload '{}' ({}, {} bytes) to {}",
            name,
            format,
            bytes.len(),
            file.path().display()
        );

        Ok(Self {
            name,
            format,
            size: bytes.len(),
            file,
        })
    }

    /// Accept an upload from a file on disk, with the default size limit
    ///
    /// The file is copied into a temp file so the original is never held open
    /// during extraction.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        Self::from_path_limited(path, ExtractorConfig::default().max_file_bytes)
    }

    /// Accept an upload from a file on disk no larger than `max_bytes`
    ///
    /// The size is checked from metadata, so an oversized file is rejected
    /// without being read.
    pub fn from_path_limited(path: impl AsRef<Path>, max_bytes: usize) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        let len = usize::try_from(fs::metadata(path)?.len()).unwrap_or(usize::MAX);
        if len > max_bytes {
            return Err(ExtractionError::TooLarge(len, max_bytes));
        }

        let bytes = fs::read(path)?;
        if bytes.len() > max_bytes {
            return Err(ExtractionError::TooLarge(bytes.len(), max_bytes));
        }
        Self::from_bytes(name, &bytes)
    }

    /// Original file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detected format
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Location of the spooled temp file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the spooled bytes back
    pub(crate) fn read_bytes(&self) -> Result<Vec<u8>, ExtractionError> {
        Ok(fs::read(self.file.path())?)
    }
}
