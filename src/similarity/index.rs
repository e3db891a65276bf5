use serde::{Deserialize, Serialize};

use crate::similarity::embedding::EmbeddingCapability;
use crate::vectorizer::dictionary::TermUniverse;

/// How a cosine between two word vectors becomes a term similarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityParams {
    /// cosines at or below this are dropped
    pub threshold: f32,
    /// kept cosines are raised to this power
    pub exponent: f32,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            exponent: 1.0,
        }
    }
}

impl SimilarityParams {
    /// Map a cosine into [0, 1]; 0 means "not a neighbor"
    #[inline]
    pub fn score(&self, cosine: f32) -> f32 {
        if !(cosine > self.threshold) {
            return 0.0;
        }
        cosine.max(0.0).powf(self.exponent).min(1.0)
    }
}

/// Unit-length vectors of a universe's terms, indexed by term id.
/// `None` for terms without a usable vector.
#[derive(Debug, Clone)]
pub struct TermVectors {
    vectors: Vec<Option<Vec<f32>>>,
}

impl TermVectors {
    #[inline]
    pub fn get(&self, term_id: usize) -> Option<&[f32]> {
        self.vectors.get(term_id).and_then(|v| v.as_deref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of terms that have a vector
    pub fn known(&self) -> usize {
        self.vectors.iter().filter(|v| v.is_some()).count()
    }
}

/// Term similarity backed by word embeddings.
pub struct WordEmbeddingSimilarityIndex<'e> {
    embedding: &'e dyn EmbeddingCapability,
    params: SimilarityParams,
}

impl<'e> WordEmbeddingSimilarityIndex<'e> {
    pub fn new(embedding: &'e dyn EmbeddingCapability, params: SimilarityParams) -> Self {
        Self { embedding, params }
    }

    #[inline]
    pub fn params(&self) -> &SimilarityParams {
        &self.params
    }

    /// Look up and normalize the vector of every term in the universe
    pub fn term_vectors(&self, universe: &TermUniverse) -> TermVectors {
        TermVectors {
            vectors: universe.terms().map(|term| self.unit_vector(term)).collect(),
        }
    }

    /// Similarity of two terms, 0 when either is unknown.
    /// A term is always fully similar to itself.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a == b {
            return 1.0;
        }
        match (self.unit_vector(a), self.unit_vector(b)) {
            (Some(va), Some(vb)) => self.params.score(dot(&va, &vb)),
            _ => 0.0,
        }
    }

    /// Up to `topn` neighbors of `term_id` with a positive score.
    /// Sorted by score descending, then by id ascending. Never includes `term_id` itself.
    pub fn most_similar(&self, vectors: &TermVectors, term_id: usize, topn: usize) -> Vec<(usize, f32)> {
        let Some(base) = vectors.get(term_id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(usize, f32)> = (0..vectors.len())
            .filter(|&other| other != term_id)
            .filter_map(|other| {
                let v = vectors.get(other)?;
                let score = self.params.score(dot(base, v));
                (score > 0.0).then_some((other, score))
            })
            .collect();
        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        neighbors.truncate(topn);
        neighbors
    }

    fn unit_vector(&self, term: &str) -> Option<Vec<f32>> {
        let raw = self.embedding.vector_for(term)?;
        let norm = dot(&raw, &raw).sqrt();
        if !(norm > 0.0) || !norm.is_finite() {
            return None;
        }
        Some(raw.iter().map(|x| x / norm).collect())
    }
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
