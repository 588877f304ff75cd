//! Chunk module - the retrieval unit

/// A contiguous span of a document's text
///
/// Chunks are derived fresh from the document on every query and never
/// persisted. `start` and `end` are character offsets (not byte offsets)
/// into the document text, half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk sequence, starting at 0
    pub index: usize,

    /// Character offset of the first character
    pub start: usize,

    /// Character offset one past the last character
    pub end: usize,

    /// The chunk's text, exactly as it appears in the document
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the span in characters
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}
