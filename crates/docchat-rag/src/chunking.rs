//! Overlapping text chunking
//!
//! Chunk `i` nominally starts at `i * (size - overlap)`. Each chunk ends at
//! the best breakpoint inside the last `size - overlap` characters of its
//! window, in order of preference:
//!
//! 1. a paragraph break (`\n\n`)
//! 2. a sentence end (`.`, `!` or `?` followed by whitespace)
//! 3. a word boundary (whitespace followed by non-whitespace)
//! 4. the window edge, cutting mid-word
//!
//! The next chunk starts `overlap` characters before the previous end,
//! moved forward to the start of a word when one exists in that span.
//! Offsets count `char`s, so a chunk never splits a code point.

use docchat_domain::Chunk;
use serde::{Deserialize, Serialize};

/// Chunk size and overlap, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk length
    pub chunk_size: usize,
    /// Characters shared by neighbouring chunks
    pub chunk_overlap: usize,
}

impl ChunkerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }
        Ok(())
    }
}

/// Splits document text into overlapping [`Chunk`]s
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    /// Create a new text chunker
    pub fn new(config: ChunkerConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings in use
    pub fn config(&self) -> ChunkerConfig {
        self.config
    }

    /// Chunk the given text
    ///
    /// Empty and whitespace-only text yield no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        if chars.len() <= size {
            return vec![Chunk::new(0, 0, chars.len(), text)];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let window_end = (start + size).min(chars.len());
            let end = if window_end == chars.len() {
                window_end
            } else {
                find_break(&chars, start + overlap + 1, window_end)
            };

            let chunk_text: String = chars[start..end].iter().collect();
            chunks.push(Chunk::new(chunks.len(), start, end, chunk_text));

            if end == chars.len() {
                break;
            }
            start = next_start(&chars, end, overlap);
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig {
                chunk_size: crate::config::DEFAULT_CHUNK_SIZE,
                chunk_overlap: crate::config::DEFAULT_CHUNK_OVERLAP,
            },
        }
    }
}

/// Best chunk end in `lo..=hi`; `hi < chars.len()` and `lo <= hi`
fn find_break(chars: &[char], lo: usize, hi: usize) -> usize {
    let candidates = || (lo..=hi).rev();

    let paragraph = candidates().find(|&p| p >= 2 && chars[p - 1] == '\n' && chars[p - 2] == '\n');
    if let Some(p) = paragraph {
        return p;
    }

    let sentence = candidates()
        .find(|&p| p >= 1 && matches!(chars[p - 1], '.' | '!' | '?') && chars[p].is_whitespace());
    if let Some(p) = sentence {
        return p;
    }

    let word = candidates().find(|&p| p >= 1 && chars[p - 1].is_whitespace() && !chars[p].is_whitespace());
    word.unwrap_or(hi)
}

/// Start of the chunk after one ending at `end`
fn next_start(chars: &[char], end: usize, overlap: usize) -> usize {
    let from = end - overlap;
    (from..end)
        .find(|&p| p == 0 || (chars[p - 1].is_whitespace() && !chars[p].is_whitespace()))
        .unwrap_or(from)
}
