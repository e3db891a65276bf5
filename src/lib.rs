//! Document ranking by soft cosine similarity over word embeddings.
//!
//! Text is normalized into tokens, weighted with TF-IDF, and compared
//! through a sparse term similarity matrix built from embedding cosines,
//! so related but different words still count toward a match.
pub mod config;
pub mod engine;
pub mod error;
pub mod preprocess;
pub mod similarity;
pub mod utils;
pub mod vectorizer;

/// Soft cosine ranking engine
/// Owns the stopword normalizer and the embedding model.
/// The model can be loaded up front (`DocSim::new`), on a background
/// thread (`DocSim::spawn`), or handed over ready made (`DocSim::with_model`).
///
/// Each query builds its own term universe, TF-IDF weights and term
/// similarity matrix, so calls share nothing but the read-only model.
pub use engine::DocSim;

/// Ranked query results
/// `(document index, score)` entries sorted by score descending,
/// ties by index ascending. Explained queries also carry per-term matches.
pub use engine::hits::{HitEntry, Hits};

/// Model selection
/// `ModelSource` names a registered model or wraps a loaded one.
/// `ModelRegistry` maps names to loader closures.
pub use engine::model::{ModelLoader, ModelRegistry, ModelSource};

/// Engine settings
pub use config::{DocSimConfig, DEFAULT_MAX_NEIGHBORS, DEFAULT_MODEL};

pub use error::{DocSimError, Result};

/// Text normalizer with a configurable stopword set
pub use preprocess::Normalizer;

/// Word vectors
/// `EmbeddingCapability` is the only interface the ranking needs.
/// `KeyedVectors` is the bundled in-memory implementation.
pub use similarity::embedding::{EmbeddingCapability, KeyedVectors};

pub use similarity::explain::{explain, explain_by_document, TermExplanation, TermScores, DEFAULT_TOP_K};
pub use similarity::index::{SimilarityParams, WordEmbeddingSimilarityIndex};
pub use similarity::matrix::TermSimilarityMatrix;
pub use similarity::soft_cosine::{rank, soft_cosine};

/// Term counts of one token sequence
pub use vectorizer::token::TermFrequency;

/// Term ids and document frequencies
/// Ids are assigned in first-seen order over the sequences it is built from.
pub use vectorizer::dictionary::TermUniverse;

pub use vectorizer::corpus::Corpus;

/// TF-IDF weighting
/// `idf = ln(N / df)`, weight = raw term frequency * idf.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine, TfIdfModel};

/// Sparse vector with implicit zeros
pub use utils::math::vector::ZeroSpVec;
