/// Errors produced by the document similarity engine
#[derive(Debug, thiserror::Error)]
pub enum DocSimError {
    /// The word vector model is still loading.
    /// Retry later, nothing was computed.
    #[error("word vector model is not ready")]
    ModelNotReady,

    /// The model source is neither a registered model name nor a prebuilt model
    #[error("unable to load word vector model: {0}")]
    UnsupportedModel(String),

    /// A term was looked up that the term dictionary never saw
    #[error("unknown term: {0}")]
    UnknownTerm(String),

    /// A model loader ran and failed
    #[error("word vector model failed to load: {0}")]
    ModelLoad(String),

    #[error("vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("malformed word vectors at line {line}: {reason}")]
    MalformedVectors { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),
}

impl DocSimError {
    /// `true` when the same call may succeed later without any change by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, DocSimError::ModelNotReady)
    }
}

pub type Result<T> = std::result::Result<T, DocSimError>;
