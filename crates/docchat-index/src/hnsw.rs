//! HNSW backend for approximate nearest-neighbour search
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//! - **efConstruction**: Candidate list size while building (default: 200)
//! - **efSearch**: Candidate list size at query time, taken from
//!   [`IndexKind::Hnsw`](crate::IndexKind::Hnsw)
//!
//! The graph returns cosine distances; hits are rescored with exact cosine
//! similarity against the stored vectors and re-sorted with [`rank`], so the
//! ordering contract matches [`FlatIndex`](crate::FlatIndex). If the graph
//! returns fewer than `k` hits the remainder is filled by exact scan.

use crate::embedding::cosine_similarity;
use crate::vector_index::{rank, IndexError, Neighbor, NeighborSearch};
use hnsw_rs::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const MAX_LAYERS: usize = 16;

/// Approximate index over a fixed set of vectors
pub struct HnswIndex {
    hnsw: Mutex<Hnsw<'static, f32, DistCosine>>,
    vectors: Vec<Vec<f32>>,
    ef_search: usize,
}

impl HnswIndex {
    /// Insert every vector; its position becomes its id
    pub fn build(vectors: Vec<Vec<f32>>, ef_search: usize) -> Result<Self, IndexError> {
        if vectors.is_empty() {
            return Err(IndexError::Empty);
        }

        let max_elements = vectors.len();
        let nb_layer = MAX_LAYERS
            .min((max_elements as f32).ln().trunc() as usize)
            .max(1);

        let hnsw = Hnsw::<'static, f32, DistCosine>::new(
            DEFAULT_M,
            max_elements,
            nb_layer,
            DEFAULT_EF_CONSTRUCTION,
            DistCosine {},
        );

        for (position, vector) in vectors.iter().enumerate() {
            hnsw.insert((vector, position));
        }

        Ok(Self {
            hnsw: Mutex::new(hnsw),
            vectors,
            ef_search: ef_search.max(1),
        })
    }

    fn score(&self, query: &[f32], position: usize) -> Option<Neighbor> {
        self.vectors.get(position).map(|vector| Neighbor {
            position,
            score: cosine_similarity(query, vector),
        })
    }
}

impl NeighborSearch for HnswIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let k = k.min(self.vectors.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let candidates = {
            let hnsw = self
                .hnsw
                .lock()
                .map_err(|e| IndexError::Internal(format!("HNSW lock poisoned: {}", e)))?;
            hnsw.search(query, k, self.ef_search.max(k))
        };

        let mut seen = HashSet::new();
        let mut hits: Vec<Neighbor> = candidates
            .into_iter()
            .filter(|neighbour| seen.insert(neighbour.d_id))
            .filter_map(|neighbour| self.score(query, neighbour.d_id))
            .collect();

        if hits.len() < k {
            let mut rest: Vec<Neighbor> = (0..self.vectors.len())
                .filter(|position| !seen.contains(position))
                .filter_map(|position| self.score(query, position))
                .collect();
            rest.sort_by(rank);
            rest.truncate(k - hits.len());
            hits.extend(rest);
        }

        hits.sort_by(rank);
        hits.truncate(k);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}
