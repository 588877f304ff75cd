//! Document module - the extracted text of one uploaded file

/// The plain text of an uploaded document
///
/// Produced once per upload by the text extractor and owned by the session
/// for as long as it stays loaded. Immutable after creation: loading a new
/// file replaces the whole `Document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Name of the source file, as given by the uploader
    name: String,

    /// Concatenated text of all pages/sections in document order
    text: String,

    /// Number of pages, for formats that have pages
    page_count: Option<u32>,
}

impl Document {
    /// Create a new document from extracted text
    ///
    /// # Examples
    ///
    /// ```
    /// use docchat_domain::Document;
    ///
    /// let doc = Document::new("notes.txt", "Some text", None);
    /// assert_eq!(doc.text(), "Some text");
    /// assert_eq!(doc.char_count(), 9);
    /// ```
    pub fn new(name: impl Into<String>, text: impl Into<String>, page_count: Option<u32>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            page_count,
        }
    }

    /// Source file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full extracted text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page count, if the source format has pages
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Length of the text in characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// True when the document has no text beyond whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
