use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::similarity::matrix::TermSimilarityMatrix;
use crate::vectorizer::dictionary::TermUniverse;

/// Default number of matches kept per query term and document
pub const DEFAULT_TOP_K: usize = 5;

/// `(document term, similarity)` pairs, best first
pub type TermScores = Vec<(String, f64)>;

/// Matches for one query term inside one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermExplanation {
    pub query_term: String,
    pub similar_terms: TermScores,
}

/// For each query term and each document, the document terms most similar
/// to the query term.
///
/// The result is flat and query-term major: entry `t * documents.len() + d`
/// belongs to query token `t` and document `d`. Only strictly positive
/// similarities are kept, sorted descending (ties keep first-seen order)
/// and cut to `top_k`.
///
/// # Errors
/// `UnknownTerm` when a token was not part of the universe the matrix was built on
pub fn explain<Q, D>(
    query_tokens: &[Q],
    documents: &[Vec<D>],
    universe: &TermUniverse,
    matrix: &TermSimilarityMatrix,
    top_k: usize,
) -> Result<Vec<TermScores>>
where
    Q: AsRef<str>,
    D: AsRef<str>,
{
    // distinct terms of each document, resolved once
    let doc_terms = documents
        .iter()
        .map(|doc| {
            let mut seen = HashSet::new();
            doc.iter()
                .map(|t| t.as_ref())
                .filter(|t| seen.insert(*t))
                .map(|t| Ok((t, universe.lookup(t)?)))
                .collect::<Result<Vec<(&str, usize)>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(query_tokens.len() * documents.len());
    for term in query_tokens {
        let query_id = universe.lookup(term.as_ref())?;
        for terms in &doc_terms {
            let mut scores: TermScores = terms
                .iter()
                .filter_map(|&(word, word_id)| {
                    let score = matrix.get(query_id, word_id);
                    (score > 0.0).then(|| (word.to_string(), score as f64))
                })
                .collect();
            scores.sort_by(|a, b| b.1.total_cmp(&a.1));
            scores.truncate(top_k);
            out.push(scores);
        }
    }
    Ok(out)
}

/// Same as [`explain`] but grouped per document:
/// `result[d]` holds one [`TermExplanation`] per query token.
pub fn explain_by_document<Q, D>(
    query_tokens: &[Q],
    documents: &[Vec<D>],
    universe: &TermUniverse,
    matrix: &TermSimilarityMatrix,
    top_k: usize,
) -> Result<Vec<Vec<TermExplanation>>>
where
    Q: AsRef<str>,
    D: AsRef<str>,
{
    let flat = explain(query_tokens, documents, universe, matrix, top_k)?;
    let doc_num = documents.len();
    let mut grouped: Vec<Vec<TermExplanation>> = (0..doc_num)
        .map(|_| Vec::with_capacity(query_tokens.len()))
        .collect();
    for (idx, similar_terms) in flat.into_iter().enumerate() {
        grouped[idx % doc_num].push(TermExplanation {
            query_term: query_tokens[idx / doc_num].as_ref().to_string(),
            similar_terms,
        });
    }
    Ok(grouped)
}
