use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::similarity::explain::TermExplanation;
use crate::similarity::soft_cosine::sort_scores;

/// One ranked document
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEntry {
    /// Position of the document in the input list
    pub index: usize,
    /// Soft cosine similarity in [0, 1]
    pub score: f64,
    /// One entry per query token, when an explanation was requested
    pub explanation: Option<Vec<TermExplanation>>,
}

impl Debug for HitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("HitEntry");
        s.field("index", &self.index).field("score", &self.score);
        if let Some(explanation) = &self.explanation {
            s.field("explanation", explanation);
        }
        s.finish()
    }
}

/// Ranked results of one similarity query
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort by descending score, ties by ascending document index
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        let mut order: Vec<(usize, f64)> = self
            .list
            .iter()
            .enumerate()
            .map(|(pos, hit)| (pos, if hit.score.is_nan() { 0.0 } else { hit.score }))
            .collect();
        // sort positions, then map back so ties fall to the document index
        order.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| self.list[a.0].index.cmp(&self.list[b.0].index))
        });
        let mut taken: Vec<Option<HitEntry>> = self.list.drain(..).map(Some).collect();
        self.list = order
            .into_iter()
            .filter_map(|(pos, _)| taken[pos].take())
            .collect();
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry> {
        self.list.iter()
    }

    /// The first `n` hits
    pub fn top(&self, n: usize) -> &[HitEntry] {
        &self.list[..n.min(self.list.len())]
    }

    /// Document indices in ranked order
    pub fn indices(&self) -> Vec<usize> {
        self.list.iter().map(|hit| hit.index).collect()
    }

    /// `(document index, score)` in ranked order
    pub fn scores(&self) -> Vec<(usize, f64)> {
        self.list.iter().map(|hit| (hit.index, hit.score)).collect()
    }

    /// Hit for a document index
    pub fn get(&self, index: usize) -> Option<&HitEntry> {
        self.list.iter().find(|hit| hit.index == index)
    }
}

impl From<Vec<(usize, f64)>> for Hits {
    fn from(mut scores: Vec<(usize, f64)>) -> Self {
        sort_scores(&mut scores);
        Hits::new(
            scores
                .into_iter()
                .map(|(index, score)| HitEntry { index, score, explanation: None })
                .collect(),
        )
    }
}

impl IntoIterator for Hits {
    type Item = HitEntry;
    type IntoIter = std::vec::IntoIter<HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Hits {
    type Item = &'a HitEntry;
    type IntoIter = std::slice::Iter<'a, HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // one hit per line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {}: {:.6}", hit.index, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. doc {} score {:.6}", rank + 1, hit.index, hit.score)?;
            for term in hit.explanation.iter().flatten() {
                let matches = term
                    .similar_terms
                    .iter()
                    .map(|(word, score)| format!("{} ({:.3})", word, score))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "       {} -> {}", term.query_term, matches)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(index: usize, score: f64) -> HitEntry {
        HitEntry { index, score, explanation: None }
    }

    #[test]
    fn sort_desc_with_index_ties() {
        let mut hits = Hits::new(vec![hit(3, 0.2), hit(1, 0.9), hit(2, 0.2), hit(0, f64::NAN)]);
        hits.sort_by_score_desc();
        assert_eq!(hits.indices(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn from_scores_sorts() {
        let hits = Hits::from(vec![(0, 0.1), (1, 0.5), (2, 0.5)]);
        assert_eq!(hits.scores(), vec![(1, 0.5), (2, 0.5), (0, 0.1)]);
        assert_eq!(hits.get(0).map(|h| h.score), Some(0.1));
        assert!(hits.get(9).is_none());
    }

    #[test]
    fn top_clamps_to_len() {
        let hits = Hits::from(vec![(0, 0.1), (1, 0.5)]);
        assert_eq!(hits.top(1).len(), 1);
        assert_eq!(hits.top(10).len(), 2);
        assert_eq!(hits.top(1)[0].index, 1);
    }

    #[test]
    fn display_lists_explanations() {
        let mut entry = hit(0, 0.75);
        entry.explanation = Some(vec![TermExplanation {
            query_term: "fast".into(),
            similar_terms: vec![("quick".into(), 0.8)],
        }]);
        let text = Hits::new(vec![entry]).to_string();
        assert!(text.contains("doc 0 score 0.750000"));
        assert!(text.contains("fast -> quick (0.800)"));
    }

    #[test]
    fn alternate_debug_is_one_hit_per_line() {
        let hits = Hits::from(vec![(4, 0.5)]);
        assert_eq!(format!("{:#?}", hits), "Hits [\n    4: 0.500000\n]");
    }
}
