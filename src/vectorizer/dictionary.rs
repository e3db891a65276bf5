use indexmap::IndexSet;

use crate::error::{DocSimError, Result};
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::{corpus::Corpus, token::TermFrequency};

/// Term universe of one ranking call.
/// Maps every distinct term of the query and documents to an id, in
/// first-seen order, and records the document frequency of each term.
///
/// Ids are only meaningful for the universe that produced them.
#[derive(Debug, Clone, Default)]
pub struct TermUniverse {
    terms: IndexSet<Box<str>>,
    corpus: Corpus,
}

impl TermUniverse {
    /// Scan the sequences in order, one document each.
    pub fn build<I, S, T>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut universe = TermUniverse {
            terms: IndexSet::new(),
            corpus: Corpus::new(),
        };
        for seq in sequences {
            let ids: Vec<usize> = seq
                .into_iter()
                .map(|token| universe.terms.insert_full(token.as_ref().into()).0)
                .collect();
            universe.corpus.add_set(&ids);
        }
        universe
    }

    /// Id of `term`
    ///
    /// # Errors
    /// `UnknownTerm` when the term was not seen at build time
    #[inline]
    pub fn lookup(&self, term: &str) -> Result<usize> {
        self.get(term)
            .ok_or_else(|| DocSimError::UnknownTerm(term.to_string()))
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    /// Term for an id
    #[inline]
    pub fn term(&self, id: usize) -> Option<&str> {
        self.terms.get_index(id).map(|t| t.as_ref())
    }

    /// Terms in id order
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(|t| t.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Bag of words: raw term counts keyed by id
    ///
    /// # Errors
    /// `UnknownTerm` for any term outside the universe
    pub fn doc2bow(&self, freq: &TermFrequency) -> Result<ZeroSpVec<u32>> {
        let pairs = freq
            .iter()
            .map(|(term, count)| Ok((self.lookup(term)?, count)))
            .collect::<Result<Vec<(usize, u32)>>>()?;
        Ok(ZeroSpVec::from_pairs(self.len(), pairs))
    }
}
