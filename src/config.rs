use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::preprocess::english_stopwords;
use crate::similarity::explain::DEFAULT_TOP_K;
use crate::similarity::index::SimilarityParams;

/// Model resolved when no other is named
pub const DEFAULT_MODEL: &str = "glove-wiki-gigaword-50";

/// Neighbor fan-out of the term similarity matrix
pub const DEFAULT_MAX_NEIGHBORS: usize = 100;

/// Settings of a [`crate::DocSim`] engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocSimConfig {
    /// Registry name used by `ModelSource::Default`
    pub model: String,
    /// `None` uses the built-in English stopwords
    pub stopwords: Option<Vec<String>>,
    pub max_neighbors: usize,
    pub explain_top_k: usize,
    pub similarity_threshold: f32,
    pub similarity_exponent: f32,
    /// Log progress at info instead of debug
    pub verbose: bool,
}

impl Default for DocSimConfig {
    fn default() -> Self {
        let params = SimilarityParams::default();
        Self {
            model: DEFAULT_MODEL.to_string(),
            stopwords: None,
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            explain_top_k: DEFAULT_TOP_K,
            similarity_threshold: params.threshold,
            similarity_exponent: params.exponent,
            verbose: false,
        }
    }
}

impl DocSimConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_stopwords<T>(mut self, stopwords: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        self.stopwords = Some(stopwords.iter().map(|w| w.as_ref().to_string()).collect());
        self
    }

    pub fn with_max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.max_neighbors = max_neighbors;
        self
    }

    pub fn with_explain_top_k(mut self, top_k: usize) -> Self {
        self.explain_top_k = top_k;
        self
    }

    pub fn with_similarity(mut self, threshold: f32, exponent: f32) -> Self {
        self.similarity_threshold = threshold;
        self.similarity_exponent = exponent;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Stopword set the engine will own
    pub fn stopword_set(&self) -> HashSet<String> {
        match &self.stopwords {
            Some(words) => words.iter().cloned().collect(),
            None => english_stopwords(),
        }
    }

    pub fn similarity_params(&self) -> SimilarityParams {
        SimilarityParams {
            threshold: self.similarity_threshold,
            exponent: self.similarity_exponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DocSimConfig::default();
        assert_eq!(config.model, "glove-wiki-gigaword-50");
        assert_eq!(config.max_neighbors, 100);
        assert_eq!(config.explain_top_k, 5);
        assert_eq!(config.similarity_params(), SimilarityParams::default());
        assert!(config.stopword_set().contains("the"));
        assert!(!config.verbose);
    }

    #[test]
    fn explicit_stopwords_replace_defaults() {
        let config = DocSimConfig::default().with_stopwords(&["foo"]);
        let set = config.stopword_set();
        assert_eq!(set.len(), 1);
        assert!(set.contains("foo"));
        assert!(!set.contains("the"));
    }

    #[test]
    fn builders_chain() {
        let config = DocSimConfig::default()
            .with_model("glove-twitter-25")
            .with_max_neighbors(10)
            .with_explain_top_k(3)
            .with_similarity(0.1, 2.0)
            .with_verbose(true);
        assert_eq!(config.model, "glove-twitter-25");
        assert_eq!(config.max_neighbors, 10);
        assert_eq!(config.explain_top_k, 3);
        assert_eq!(config.similarity_params(), SimilarityParams { threshold: 0.1, exponent: 2.0 });
        assert!(config.verbose);
    }

    #[test]
    fn cbor_round_trip_keeps_settings() {
        let config = DocSimConfig::default().with_stopwords(&["a", "b"]).with_max_neighbors(7);
        let bytes = serde_cbor::to_vec(&config).unwrap();
        let back: DocSimConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(back, config);
    }
}
