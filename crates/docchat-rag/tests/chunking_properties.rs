//! Property tests for the chunker

use docchat_rag::{ChunkerConfig, TextChunker};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = ChunkerConfig> {
    (1usize..60).prop_flat_map(|size| {
        (Just(size), 0..size).prop_map(|(chunk_size, chunk_overlap)| ChunkerConfig {
            chunk_size,
            chunk_overlap,
        })
    })
}

proptest! {
    /// Property: the non-overlapping parts of the chunks rebuild the input
    #[test]
    fn test_chunks_reconstruct_input(
        text in "[a-zé .!?\n]{0,300}",
        config in config_strategy(),
    ) {
        let chunks = TextChunker::new(config).unwrap().chunk(&text);

        if text.trim().is_empty() {
            prop_assert!(chunks.is_empty());
            return Ok(());
        }

        let chars: Vec<char> = text.chars().collect();
        let mut rebuilt = chunks[0].text.clone();
        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            prop_assert!(next.start <= prev.end, "gap between chunks");
            prop_assert!(next.start > prev.start, "no progress");
            prop_assert!(prev.end - next.start <= config.chunk_overlap);
            rebuilt.extend(&chars[prev.end..next.end]);
        }

        prop_assert_eq!(rebuilt, text.clone());
        prop_assert_eq!(chunks[0].start, 0);
        prop_assert_eq!(chunks[chunks.len() - 1].end, chars.len());
    }

    /// Property: every chunk fits the size limit and matches its offsets
    #[test]
    fn test_chunks_within_size(
        text in "[a-z .\n]{1,300}",
        config in config_strategy(),
    ) {
        let chars: Vec<char> = text.chars().collect();
        for (i, chunk) in TextChunker::new(config).unwrap().chunk(&text).iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
            prop_assert!(chunk.char_len() <= config.chunk_size);
            let expected: String = chars[chunk.start..chunk.end].iter().collect();
            prop_assert_eq!(&chunk.text, &expected);
        }
    }

    /// Property: chunking is deterministic
    #[test]
    fn test_chunking_deterministic(text in "[a-z .\n]{0,200}") {
        let chunker = TextChunker::default();
        prop_assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
    }
}
