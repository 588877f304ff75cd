//! PDF text extraction

use crate::error::ExtractionError;
use lopdf::Document as PdfDocument;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Text pulled out of a PDF
#[derive(Debug)]
pub(crate) struct PdfText {
    pub text: String,
    pub page_count: u32,
}

/// Extract the text of every page, in page order
///
/// `pdf-extract` handles font encodings well but can fail (or panic) on
/// unusual files; when `fallback` is set, lopdf's per-page extractor is
/// tried next.
pub(crate) fn extract_pdf(bytes: &[u8], fallback: bool) -> Result<PdfText, ExtractionError> {
    let doc = PdfDocument::load_mem(bytes).map_err(classify_load_error)?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(ExtractionError::Encrypted);
    }

    let page_count = doc.get_pages().len() as u32;
    debug!("PDF has {} pages", page_count);

    let primary = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    let text = match primary {
        Ok(Ok(text)) if !text.trim().is_empty() => text,
        Ok(Ok(_)) => {
            debug!("pdf-extract produced no text");
            fallback_text(&doc, fallback)?
        }
        Ok(Err(e)) => {
            warn!("pdf-extract failed: {}, trying fallback", e);
            fallback_text(&doc, fallback)?
        }
        Err(_) => {
            warn!("pdf-extract panicked, trying fallback");
            fallback_text(&doc, fallback)?
        }
    };

    let text = cleanup_pdf_text(&text);
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }

    Ok(PdfText { text, page_count })
}

fn fallback_text(doc: &PdfDocument, enabled: bool) -> Result<String, ExtractionError> {
    if !enabled {
        return Err(ExtractionError::NoText);
    }

    let mut all_text = String::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) => {
                all_text.push_str(&page_text);
                if !page_text.ends_with('\n') {
                    all_text.push('\n');
                }
            }
            Err(e) => {
                debug!("Could not extract text from page {}: {}", page_number, e);
            }
        }
    }

    if all_text.trim().is_empty() {
        warn!("Fallback extraction produced no text, PDF may be image-based");
        return Err(ExtractionError::NoText);
    }

    Ok(all_text)
}

fn classify_load_error(e: lopdf::Error) -> ExtractionError {
    let message = e.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("decrypt") {
        ExtractionError::Encrypted
    } else {
        ExtractionError::Corrupt(message)
    }
}

/// Normalize typographic characters common in PDF output
pub(crate) fn cleanup_pdf_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{00A0}', " ")
        .replace(['\u{2010}', '\u{2011}', '\u{2013}'], "-")
        .replace('\u{2014}', "--")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
}
