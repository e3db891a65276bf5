use std::cmp::Ordering;

use num::Num;
use rayon::prelude::*;

use crate::similarity::matrix::TermSimilarityMatrix;
use crate::utils::math::vector::ZeroSpVec;

/// Soft cosine similarity
/// score(q, d) = qᵗMd / (sqrt(qᵗMq) * sqrt(dᵗMd))
///
/// Zero norms give 0. The result is clamped to [0, 1].
pub fn soft_cosine<A, B>(matrix: &TermSimilarityMatrix, a: &ZeroSpVec<A>, b: &ZeroSpVec<B>) -> f64
where
    A: Num + Copy + Into<f64>,
    B: Num + Copy + Into<f64>,
{
    let aa = matrix.inner_product(a, a);
    let bb = matrix.inner_product(b, b);
    score_from_parts(matrix.inner_product(a, b), aa, bb)
}

#[inline]
fn score_from_parts(ab: f64, aa: f64, bb: f64) -> f64 {
    if !(aa > 0.0) || !(bb > 0.0) {
        return 0.0;
    }
    let score = ab / (aa.sqrt() * bb.sqrt());
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Score every document against the query.
/// Returns `(document index, score)` sorted by score descending, ties by
/// index ascending.
pub fn rank<N>(
    query: &ZeroSpVec<N>,
    documents: &[ZeroSpVec<N>],
    matrix: &TermSimilarityMatrix,
) -> Vec<(usize, f64)>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    let qq = matrix.inner_product(query, query);
    let mut scores: Vec<(usize, f64)> = documents
        .par_iter()
        .enumerate()
        .map(|(idx, doc)| {
            let dd = matrix.inner_product(doc, doc);
            let qd = matrix.inner_product(query, doc);
            (idx, score_from_parts(qd, qq, dd))
        })
        .collect();
    sort_scores(&mut scores);
    scores
}

/// score descending, then index ascending
pub fn sort_scores(scores: &mut [(usize, f64)]) {
    scores.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
}
