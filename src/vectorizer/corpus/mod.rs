use serde::{Deserialize, Serialize};

/// Document count and per-term document frequency of the fit corpus.
/// Terms are addressed by their dictionary id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    doc_num: u64,
    /// documents containing each term, indexed by term id
    term_counts: Vec<u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: Vec::new(),
        }
    }

    /// Add one document given its distinct term ids.
    /// Repeated ids in `term_ids` are counted once.
    pub fn add_set(&mut self, term_ids: &[usize]) {
        self.doc_num += 1;
        let mut seen: Vec<usize> = term_ids.to_vec();
        seen.sort_unstable();
        seen.dedup();
        for id in seen {
            if id >= self.term_counts.len() {
                self.term_counts.resize(id + 1, 0);
            }
            self.term_counts[id] += 1;
        }
    }

    /// Number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing the term, 0 for unseen ids
    #[inline]
    pub fn get_term_count(&self, term_id: usize) -> u64 {
        self.term_counts.get(term_id).copied().unwrap_or(0)
    }

    /// Number of term ids with a count
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }
}
