//! Model sources and the readiness slot shared with the loader thread.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::error::{DocSimError, Result};
use crate::similarity::embedding::{EmbeddingCapability, KeyedVectors};

/// Builds an embedding model; may take long
pub type ModelLoader = Arc<dyn Fn() -> Result<Arc<dyn EmbeddingCapability>> + Send + Sync>;

/// Where the word vectors come from
#[derive(Clone)]
pub enum ModelSource {
    /// The model named by `DocSimConfig::model`
    Default,
    /// A model registered in the [`ModelRegistry`]
    Named(String),
    /// A ready-made model
    Custom(Arc<dyn EmbeddingCapability>),
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Default => write!(f, "Default"),
            ModelSource::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ModelSource::Custom(model) => write!(f, "Custom(dim={})", model.dim()),
        }
    }
}

impl From<&str> for ModelSource {
    fn from(name: &str) -> Self {
        ModelSource::Named(name.to_string())
    }
}

impl From<KeyedVectors> for ModelSource {
    fn from(kv: KeyedVectors) -> Self {
        ModelSource::Custom(Arc::new(kv))
    }
}

impl From<Arc<dyn EmbeddingCapability>> for ModelSource {
    fn from(model: Arc<dyn EmbeddingCapability>) -> Self {
        ModelSource::Custom(model)
    }
}

/// Named model loaders.
/// Fetching and caching model files is up to the registered loader.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    loaders: IndexMap<String, ModelLoader>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.loaders.keys()).finish()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` under `name`, replacing any earlier one
    pub fn register<F>(&mut self, name: impl Into<String>, loader: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn EmbeddingCapability>> + Send + Sync + 'static,
    {
        self.loaders.insert(name.into(), Arc::new(loader));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.loaders.keys().map(|k| k.as_str())
    }

    /// # Errors
    /// `UnsupportedModel` when nothing is registered under `name`
    pub fn loader(&self, name: &str) -> Result<ModelLoader> {
        self.loaders.get(name).cloned().ok_or_else(|| {
            DocSimError::UnsupportedModel(format!(
                "no model registered as {:?} (known: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }
}

/// A model source checked against the registry, not yet loaded
pub(crate) struct PendingModel {
    pub(crate) name: String,
    pub(crate) loader: ModelLoader,
}

impl PendingModel {
    /// Fails fast on names the registry does not know
    pub(crate) fn resolve(source: ModelSource, default_name: &str, registry: &ModelRegistry) -> Result<Self> {
        match source {
            ModelSource::Default => Ok(Self {
                name: default_name.to_string(),
                loader: registry.loader(default_name)?,
            }),
            ModelSource::Named(name) => {
                let loader = registry.loader(&name)?;
                Ok(Self { name, loader })
            }
            ModelSource::Custom(model) => Ok(Self {
                name: "custom".to_string(),
                loader: Arc::new(move || Ok(Arc::clone(&model))),
            }),
        }
    }

    pub(crate) fn load(&self) -> Result<Arc<dyn EmbeddingCapability>> {
        (self.loader)()
    }
}

const LOADING: u8 = 0;
const READY: u8 = 1;
const FAILED: u8 = 2;

/// Holds the model once loaded.
/// Written once by the loader, read by every ranking call.
pub(crate) struct ModelSlot {
    state: AtomicU8,
    model: OnceCell<Arc<dyn EmbeddingCapability>>,
    failure: OnceCell<String>,
}

impl ModelSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(LOADING),
            model: OnceCell::new(),
            failure: OnceCell::new(),
        }
    }

    pub(crate) fn publish(&self, result: Result<Arc<dyn EmbeddingCapability>>) {
        match result {
            Ok(model) => {
                let _ = self.model.set(model);
                self.state.store(READY, Ordering::Release);
            }
            Err(err) => {
                let _ = self.failure.set(err.to_string());
                self.state.store(FAILED, Ordering::Release);
            }
        }
    }

    /// Fail a load whose loader exited without publishing.
    /// No-op once a result was published.
    pub(crate) fn abandon(&self, reason: &str) {
        let _ = self.failure.set(reason.to_string());
        let _ = self
            .state
            .compare_exchange(LOADING, FAILED, Ordering::AcqRel, Ordering::Acquire);
    }

    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// The model, `ModelNotReady` while loading, `ModelLoad` after a failure
    pub(crate) fn get(&self) -> Result<Arc<dyn EmbeddingCapability>> {
        match self.state.load(Ordering::Acquire) {
            READY => self.model.get().cloned().ok_or(DocSimError::ModelNotReady),
            FAILED => Err(DocSimError::ModelLoad(
                self.failure.get().cloned().unwrap_or_default(),
            )),
            _ => Err(DocSimError::ModelNotReady),
        }
    }
}
