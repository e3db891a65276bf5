use num::Num;
use rayon::prelude::*;

use crate::similarity::embedding::EmbeddingCapability;
use crate::similarity::index::{SimilarityParams, WordEmbeddingSimilarityIndex};
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::dictionary::TermUniverse;

/// Sparse term-by-term similarity over one term universe.
///
/// Row `i` holds the self similarity 1.0 plus at most `max_neighbors`
/// of the best scoring other terms. Rows are trimmed independently, so
/// `get(i, j)` and `get(j, i)` can differ even though the underlying
/// similarity is symmetric.
#[derive(Debug, Clone)]
pub struct TermSimilarityMatrix {
    rows: Vec<ZeroSpVec<f32>>,
    max_neighbors: usize,
}

impl TermSimilarityMatrix {
    /// Build with the default similarity parameters
    pub fn build(universe: &TermUniverse, embedding: &dyn EmbeddingCapability, max_neighbors: usize) -> Self {
        let index = WordEmbeddingSimilarityIndex::new(embedding, SimilarityParams::default());
        Self::build_with_index(universe, &index, max_neighbors)
    }

    pub fn build_with_index(
        universe: &TermUniverse,
        index: &WordEmbeddingSimilarityIndex<'_>,
        max_neighbors: usize,
    ) -> Self {
        let vectors = index.term_vectors(universe);
        let dim = universe.len();
        let rows = (0..dim)
            .into_par_iter()
            .map(|term_id| {
                let mut pairs = index.most_similar(&vectors, term_id, max_neighbors);
                pairs.push((term_id, 1.0));
                let mut row = ZeroSpVec::from_pairs(dim, pairs);
                row.shrink_to_fit();
                row
            })
            .collect();
        Self { rows, max_neighbors }
    }

    /// Entry (i, j), 0 when not retained
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.rows
            .get(i)
            .and_then(|row| row.get(j))
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn row(&self, i: usize) -> Option<&ZeroSpVec<f32>> {
        self.rows.get(i)
    }

    /// Number of terms
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }

    /// Stored entries, diagonal included
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|row| row.nnz()).sum()
    }

    /// aᵗ M b
    pub fn inner_product<A, B>(&self, a: &ZeroSpVec<A>, b: &ZeroSpVec<B>) -> f64
    where
        A: Num + Copy + Into<f64>,
        B: Num + Copy + Into<f64>,
    {
        a.raw_iter()
            .map(|(i, &ai)| match self.rows.get(i) {
                Some(row) => ai.into() * row.dot(b),
                None => 0.0,
            })
            .sum()
    }
}
