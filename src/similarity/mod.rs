//! Embedding-aware similarity.
//!
//! Term vectors come from an [`embedding::EmbeddingCapability`], pairwise
//! term similarities are kept in a sparse [`matrix::TermSimilarityMatrix`],
//! and documents are compared with the soft cosine measure over that matrix.

pub mod embedding;
pub mod explain;
pub mod index;
pub mod matrix;
pub mod soft_cosine;
