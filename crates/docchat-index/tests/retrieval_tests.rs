//! Retrieval properties shared by every index backend

use docchat_domain::{Chunk, Embedder};
use docchat_index::{HashEmbedder, IndexKind, ScoredChunk, VectorIndex};
use proptest::prelude::*;

fn chunks_for(texts: &[String]) -> Vec<Chunk> {
    let mut offset = 0;
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let len = text.chars().count();
            let chunk = Chunk::new(i, offset, offset + len, text.clone());
            offset += len;
            chunk
        })
        .collect()
}

fn assert_ranked(results: &[ScoredChunk]) -> Result<(), TestCaseError> {
    for pair in results.windows(2) {
        prop_assert!(pair[0].score >= pair[1].score, "scores must not increase");
        if pair[0].score == pair[1].score {
            prop_assert!(pair[0].chunk.index < pair[1].chunk.index, "ties keep chunk order");
        }
    }
    Ok(())
}

fn vectors_strategy() -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1usize..5).prop_flat_map(|dim| {
        prop::collection::vec(prop::collection::vec(-1.0f32..1.0, dim), 1..24)
    })
}

/// Non-zero components only: the HNSW cosine distance is undefined for zero vectors
fn nonzero_vectors_strategy() -> impl Strategy<Value = Vec<Vec<f32>>> {
    (2usize..5).prop_flat_map(|dim| {
        prop::collection::vec(prop::collection::vec(0.05f32..1.0, dim), 1..24)
    })
}

proptest! {
    /// Property: exact search returns min(k, n) hits in rank order
    #[test]
    fn test_exact_search_size_and_order(vectors in vectors_strategy(), k in 0usize..30) {
        let n = vectors.len();
        let query = vectors[0].clone();
        let texts: Vec<String> = (0..n).map(|i| format!("c{}", i)).collect();
        let index = VectorIndex::build(chunks_for(&texts), vectors).unwrap();

        let results = index.search(&query, k).unwrap();
        prop_assert_eq!(results.len(), k.min(n));
        assert_ranked(&results)?;
    }

    /// Property: HNSW search keeps the same size and ordering contract
    #[test]
    fn test_hnsw_search_size_and_order(vectors in nonzero_vectors_strategy(), k in 0usize..30) {
        let n = vectors.len();
        let query = vectors[n - 1].clone();
        let texts: Vec<String> = (0..n).map(|i| format!("c{}", i)).collect();
        let index = VectorIndex::build_with(
            chunks_for(&texts),
            vectors,
            IndexKind::Hnsw { ef_search: 32 },
        )
        .unwrap();

        let results = index.search(&query, k).unwrap();
        prop_assert_eq!(results.len(), k.min(n));
        assert_ranked(&results)?;
    }

    /// Property: embedding and retrieval are deterministic across runs
    #[test]
    fn test_retrieval_deterministic(
        texts in prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,6}", 1..12),
        question in "[a-z]{1,8}( [a-z]{1,8}){0,3}",
    ) {
        let run = || {
            let embedder = HashEmbedder::default();
            let vectors: Vec<Vec<f32>> = texts.iter().map(|t| embedder.embed_sync(t)).collect();
            let index = VectorIndex::build(chunks_for(&texts), vectors).unwrap();
            index.search(&embedder.embed_sync(&question), 4).unwrap()
        };

        prop_assert_eq!(run(), run());
    }
}

#[tokio::test]
async fn test_relevant_chunk_ranks_first() {
    let texts = vec![
        "Rust guarantees memory safety without a garbage collector.".to_string(),
        "Segment Anything Model (SAM) is an AI model from Meta AI.".to_string(),
        "Bread is baked from flour, water and yeast.".to_string(),
    ];
    let embedder = HashEmbedder::default();
    let vectors = embedder.embed_batch(&texts).await.unwrap();
    let index = VectorIndex::build(chunks_for(&texts), vectors).unwrap();

    let query = embedder.embed("What is SAM?").await.unwrap();
    let results = index.search(&query, 4).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk.index, 1);
}

#[test]
fn test_empty_query_vector_still_returns_hits() {
    let texts = vec!["alpha beta".to_string(), "gamma".to_string()];
    let embedder = HashEmbedder::new(64);
    let vectors: Vec<Vec<f32>> = texts.iter().map(|t| embedder.embed_sync(t)).collect();
    let index = VectorIndex::build(chunks_for(&texts), vectors).unwrap();

    let results = index.search(&embedder.embed_sync(""), 4).unwrap();
    let order: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
    assert_eq!(order, vec![0, 1]);
}
