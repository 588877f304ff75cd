//! docchat Extractor
//!
//! Turns an uploaded file into a [`Document`](docchat_domain::Document): a
//! single plain-text string holding every page in order.
//!
//! # Architecture
//!
//! ```text
//! bytes/path → Upload (temp file) → TextExtractor → Document
//! ```
//!
//! - **Boundary check**: [`Upload`] rejects unsupported file types before any
//!   parsing happens
//! - **Scoped storage**: the upload lives in a temp file that is removed when
//!   the `Upload` drops, whether extraction succeeds, fails or panics
//! - **PDF**: `pdf-extract` first, `lopdf` page-by-page as fallback
//! - **Plain text**: UTF-8 `.txt` / `.md`
//!
//! # Example Usage
//!
//! ```no_run
//! use docchat_extractor::{TextExtractor, Upload};
//!
//! # fn example() -> Result<(), docchat_extractor::ExtractionError> {
//! let upload = Upload::from_path("paper.pdf")?;
//! let extractor = TextExtractor::default();
//! let document = extractor.extract(upload)?;
//!
//! println!("{} characters from {}", document.char_count(), document.name());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod format;
mod pdf;
mod upload;

pub use config::ExtractorConfig;
pub use error::ExtractionError;
pub use extractor::TextExtractor;
pub use format::DocumentFormat;
pub use upload::Upload;
