use std::marker::PhantomData;

use num::Num;

use crate::error::Result;
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::{corpus::Corpus, dictionary::TermUniverse, token::TermFrequency};

pub trait TFIDFEngine<N>
where
    N: Num + Copy,
{
    /// IDF per term id
    /// # Arguments
    /// * `corpus` - document frequencies of the fit corpus
    /// # Returns
    /// * `Vec<f64>` - IDF indexed by term id
    fn idf_vec(corpus: &Corpus) -> Vec<f64>;

    /// Weight a bag of words
    /// # Arguments
    /// * `bow` - raw term counts by id
    /// * `idf` - output of `idf_vec`
    fn tfidf_vec(bow: &ZeroSpVec<u32>, idf: &[f64]) -> ZeroSpVec<N>;
}

/// Default TF-IDF engine
/// idf(t) = ln(N / df(t)), weight = tf * idf.
/// Terms with no document frequency weigh zero.
/// Supports `f32` and `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        if doc_freq == 0 || doc_num == 0 {
            return 0.0;
        }
        (doc_num as f64 / doc_freq as f64).ln()
    }

    fn idf_all(corpus: &Corpus) -> Vec<f64> {
        let doc_num = corpus.get_doc_num();
        (0..corpus.vocab_size())
            .map(|id| Self::idf(doc_num, corpus.get_term_count(id)))
            .collect()
    }

    fn weighted_pairs<'a>(bow: &'a ZeroSpVec<u32>, idf: &'a [f64]) -> impl Iterator<Item = (usize, f64)> + 'a {
        bow.raw_iter().map(move |(id, &count)| {
            let idf = idf.get(id).copied().unwrap_or(0.0);
            (id, count as f64 * idf)
        })
    }
}

impl TFIDFEngine<f64> for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus) -> Vec<f64> {
        Self::idf_all(corpus)
    }

    fn tfidf_vec(bow: &ZeroSpVec<u32>, idf: &[f64]) -> ZeroSpVec<f64> {
        ZeroSpVec::from_pairs(bow.len(), Self::weighted_pairs(bow, idf))
    }
}

impl TFIDFEngine<f32> for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus) -> Vec<f64> {
        Self::idf_all(corpus)
    }

    fn tfidf_vec(bow: &ZeroSpVec<u32>, idf: &[f64]) -> ZeroSpVec<f32> {
        ZeroSpVec::from_pairs(
            bow.len(),
            Self::weighted_pairs(bow, idf).map(|(id, w)| (id, w as f32)),
        )
    }
}

/// Term weighting fit over one term universe.
/// Turns token sequences into sparse TF-IDF vectors keyed by term id.
#[derive(Debug, Clone)]
pub struct TfIdfModel<'a, N = f64, E = DefaultTFIDFEngine>
where
    N: Num + Copy,
    E: TFIDFEngine<N>,
{
    universe: &'a TermUniverse,
    idf_vec: Vec<f64>,
    _marker: PhantomData<(N, E)>,
}

impl<'a, N, E> TfIdfModel<'a, N, E>
where
    N: Num + Copy,
    E: TFIDFEngine<N>,
{
    /// Fit on the universe's corpus statistics
    pub fn fit(universe: &'a TermUniverse) -> Self {
        Self {
            universe,
            idf_vec: E::idf_vec(universe.corpus()),
            _marker: PhantomData,
        }
    }

    /// IDF of a term id, 0 for ids outside the fit corpus
    #[inline]
    pub fn idf(&self, term_id: usize) -> f64 {
        self.idf_vec.get(term_id).copied().unwrap_or(0.0)
    }

    /// Weighted sparse vector of a token sequence
    ///
    /// # Errors
    /// `UnknownTerm` when a token is outside the universe
    pub fn weight<T>(&self, tokens: &[T]) -> Result<ZeroSpVec<N>>
    where
        T: AsRef<str>,
    {
        let bow = self.universe.doc2bow(&TermFrequency::from_tokens(tokens))?;
        Ok(E::tfidf_vec(&bow, &self.idf_vec))
    }

    pub fn weight_all<T>(&self, sequences: &[Vec<T>]) -> Result<Vec<ZeroSpVec<N>>>
    where
        T: AsRef<str>,
    {
        sequences.iter().map(|seq| self.weight(seq)).collect()
    }
}
