//! Top-level ranking engine.
//!
//! [`DocSim`] owns the normalizer and the embedding model. Every query
//! rebuilds the term universe, the TF-IDF model and the term similarity
//! matrix for its own documents; only the model is shared between calls.

pub mod hits;
pub mod model;

use std::iter::once;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, log, warn, Level};

use crate::config::DocSimConfig;
use crate::error::{DocSimError, Result};
use crate::preprocess::Normalizer;
use crate::similarity::embedding::EmbeddingCapability;
use crate::similarity::explain::explain_by_document;
use crate::similarity::index::WordEmbeddingSimilarityIndex;
use crate::similarity::matrix::TermSimilarityMatrix;
use crate::similarity::soft_cosine;
use crate::vectorizer::dictionary::TermUniverse;
use crate::vectorizer::tfidf::TfIdfModel;

pub use hits::{HitEntry, Hits};
pub use model::{ModelLoader, ModelRegistry, ModelSource};
use model::{ModelSlot, PendingModel};

/// Soft cosine document ranker
///
/// # Examples
/// ```
/// use docsim::{DocSim, DocSimConfig, KeyedVectors};
///
/// let mut kv = KeyedVectors::new(2);
/// kv.insert("fast", vec![1.0, 0.0]).unwrap();
/// kv.insert("quick", vec![0.8, 0.6]).unwrap();
///
/// let engine = DocSim::with_model(DocSimConfig::default(), kv);
/// let hits = engine.similarity_query("fast", &["quick", "slow"]).unwrap();
/// assert_eq!(hits.indices(), vec![0, 1]);
/// ```
pub struct DocSim {
    config: DocSimConfig,
    normalizer: Normalizer,
    slot: Arc<ModelSlot>,
    loader: Mutex<Option<JoinHandle<()>>>,
}

impl DocSim {
    /// Resolve `source` and load it on the calling thread
    ///
    /// # Errors
    /// `UnsupportedModel` for unknown names, `ModelLoad` when the loader fails
    pub fn new(config: DocSimConfig, source: ModelSource, registry: &ModelRegistry) -> Result<Self> {
        let pending = PendingModel::resolve(source, &config.model, registry)?;
        let engine = Self::pending(config);
        let level = engine.progress_level();
        log!(level, "loading model {}", pending.name);
        let model = pending
            .load()
            .map_err(|err| DocSimError::ModelLoad(format!("{}: {}", pending.name, err)))?;
        log!(level, "model {} ready (dim {})", pending.name, model.dim());
        engine.slot.publish(Ok(model));
        Ok(engine)
    }

    /// Resolve `source` now and load it on a background thread.
    /// Queries fail with `ModelNotReady` until the load completes.
    ///
    /// # Errors
    /// `UnsupportedModel` for unknown names; load failures surface later as `ModelLoad`
    pub fn spawn(config: DocSimConfig, source: ModelSource, registry: &ModelRegistry) -> Result<Self> {
        let pending = PendingModel::resolve(source, &config.model, registry)?;
        let engine = Self::pending(config);
        let level = engine.progress_level();
        let slot = Arc::clone(&engine.slot);

        let handle = thread::Builder::new()
            .name(format!("docsim-load-{}", pending.name))
            .spawn(move || {
                log!(level, "loading model {} in background", pending.name);
                let result = panic::catch_unwind(AssertUnwindSafe(|| pending.load()))
                    .unwrap_or_else(|_| Err(DocSimError::ModelLoad("loader panicked".to_string())));
                match &result {
                    Ok(model) => log!(level, "model {} ready (dim {})", pending.name, model.dim()),
                    Err(err) => warn!("model {} failed to load: {}", pending.name, err),
                }
                slot.publish(result);
            })?;

        *engine.loader.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        Ok(engine)
    }

    /// Engine over an already built model.
    /// Named models go through [`DocSim::new`] or [`DocSim::spawn`]:
    ///
    /// ```compile_fail
    /// use docsim::{DocSim, DocSimConfig};
    ///
    /// let engine = DocSim::with_model(DocSimConfig::default(), "glove-twitter-25");
    /// ```
    pub fn with_model<M>(config: DocSimConfig, model: M) -> Self
    where
        M: EmbeddingCapability + 'static,
    {
        let engine = Self::pending(config);
        engine.slot.publish(Ok(Arc::new(model)));
        engine
    }

    fn pending(config: DocSimConfig) -> Self {
        let normalizer = Normalizer::new(config.stopword_set());
        Self {
            config,
            normalizer,
            slot: Arc::new(ModelSlot::new()),
            loader: Mutex::new(None),
        }
    }

    #[inline]
    fn progress_level(&self) -> Level {
        if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    /// Block until a background load finishes.
    /// Returns right away for engines loaded synchronously.
    ///
    /// # Errors
    /// `ModelLoad` when the load failed
    pub fn wait_ready(&self) -> Result<()> {
        let handle = self.loader.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("model loader thread died before reporting");
                self.slot.abandon("loader thread died");
            }
        }
        self.slot.get().map(|_| ())
    }

    pub fn config(&self) -> &DocSimConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The loaded model
    ///
    /// # Errors
    /// `ModelNotReady` while loading, `ModelLoad` after a failed load
    pub fn model(&self) -> Result<Arc<dyn EmbeddingCapability>> {
        self.slot.get()
    }

    /// Tokens the engine would see for `text`
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        self.normalizer.normalize(text)
    }

    /// Rank `documents` by soft cosine similarity to `query`
    ///
    /// # Errors
    /// `ModelNotReady` while the model is loading; retry later
    pub fn similarity_query<T>(&self, query: &str, documents: &[T]) -> Result<Hits>
    where
        T: AsRef<str>,
    {
        self.run(query, documents, false)
    }

    /// Like [`DocSim::similarity_query`], with every hit carrying the
    /// document terms that matched each query token
    pub fn similarity_query_explained<T>(&self, query: &str, documents: &[T]) -> Result<Hits>
    where
        T: AsRef<str>,
    {
        self.run(query, documents, true)
    }

    fn run<T>(&self, query: &str, documents: &[T], explain: bool) -> Result<Hits>
    where
        T: AsRef<str>,
    {
        let model = match self.slot.get() {
            Ok(model) => model,
            Err(err) => {
                log!(self.progress_level(), "query rejected: {}", err);
                return Err(err);
            }
        };
        let level = self.progress_level();

        let corpus = self.normalizer.normalize_all(documents);
        let query_tokens = self.normalizer.normalize(query);
        log!(level, "ranking {} documents, {} query tokens", corpus.len(), query_tokens.len());

        // the query counts as one more document for idf
        let universe = TermUniverse::build(corpus.iter().chain(once(&query_tokens)));
        let tfidf: TfIdfModel = TfIdfModel::fit(&universe);
        log!(level, "vocabulary size {}", universe.len());

        let index = WordEmbeddingSimilarityIndex::new(model.as_ref(), self.config.similarity_params());
        let matrix = TermSimilarityMatrix::build_with_index(&universe, &index, self.config.max_neighbors);
        log!(
            level,
            "term similarity matrix: {} terms, {} stored entries",
            matrix.len(),
            matrix.nnz()
        );

        let query_vec = tfidf.weight(&query_tokens)?;
        let doc_vecs = tfidf.weight_all(&corpus)?;
        let mut hits = Hits::from(soft_cosine::rank(&query_vec, &doc_vecs, &matrix));

        if explain {
            let mut grouped = explain_by_document(
                &query_tokens,
                &corpus,
                &universe,
                &matrix,
                self.config.explain_top_k,
            )?;
            for hit in hits.list.iter_mut() {
                hit.explanation = grouped.get_mut(hit.index).map(std::mem::take);
            }
        }
        debug!("top hit: {:?}", hits.list.first().map(|h| (h.index, h.score)));
        Ok(hits)
    }
}
