//! Word embedding lookup.
//!
//! The ranking core only needs [`EmbeddingCapability::vector_for`].
//! [`KeyedVectors`] is an in-memory implementation that reads the
//! GloVe / word2vec text format and round-trips through CBOR.

use std::borrow::Cow;
use std::io::{BufRead, Read, Write};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocSimError, Result};

/// Term to fixed-length vector lookup.
/// Shared read-only across ranking calls, so it must be `Send + Sync`.
pub trait EmbeddingCapability: Send + Sync {
    /// Vector of `term`, `None` when the term is unknown
    fn vector_for(&self, term: &str) -> Option<Cow<'_, [f32]>>;

    /// Length of every returned vector
    fn dim(&self) -> usize;
}

/// In-memory word vectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyedVectors {
    dim: usize,
    vectors: IndexMap<Box<str>, Vec<f32>>,
}

impl KeyedVectors {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: IndexMap::new(),
        }
    }

    /// Add or replace the vector of `term`
    ///
    /// # Errors
    /// `DimensionMismatch` when `vector.len()` differs from `dim()`
    pub fn insert(&mut self, term: &str, vector: Vec<f32>) -> Result<&mut Self> {
        if vector.len() != self.dim {
            return Err(DocSimError::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
            });
        }
        self.vectors.insert(term.into(), vector);
        Ok(self)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.vectors.contains_key(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Parse the whitespace separated text format:
    /// one `term v1 v2 ... vd` per line, with an optional leading
    /// `count dim` header as written by word2vec.
    /// Blank lines are skipped.
    ///
    /// A first line of two integers is only taken as a header when the
    /// row after it has `dim` values (or when `count` is 0). Otherwise it
    /// is the first row of a one-dimensional file.
    pub fn from_text<R: BufRead>(reader: R) -> Result<Self> {
        let mut kv: Option<KeyedVectors> = None;
        let mut header: Option<HeaderCandidate> = None;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let mut fields = line.split_whitespace();
            let Some(term) = fields.next() else {
                continue;
            };
            let values: Vec<&str> = fields.collect();

            if kv.is_none() && header.is_none() && values.len() == 1 {
                if let (Ok(count), Ok(dim)) = (term.parse::<usize>(), values[0].parse::<usize>()) {
                    header = Some(HeaderCandidate {
                        line: line_no,
                        term: term.to_string(),
                        value: values[0].to_string(),
                        count,
                        dim,
                    });
                    continue;
                }
            }

            if let Some(candidate) = header.take() {
                if values.len() == candidate.dim {
                    kv = Some(KeyedVectors::new(candidate.dim));
                } else {
                    candidate.push_as_row(&mut kv)?;
                }
            }
            push_row(&mut kv, line_no, term, &values)?;
        }
        if let Some(candidate) = header {
            if candidate.count == 0 {
                kv = Some(KeyedVectors::new(candidate.dim));
            } else {
                candidate.push_as_row(&mut kv)?;
            }
        }
        Ok(kv.unwrap_or_default())
    }

    pub fn write_cbor<W: Write>(&self, writer: W) -> Result<()> {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    /// Read vectors written by [`KeyedVectors::write_cbor`]
    ///
    /// # Errors
    /// `DimensionMismatch` when a stored vector disagrees with the stored dimension
    pub fn read_cbor<R: Read>(reader: R) -> Result<Self> {
        let kv: KeyedVectors = serde_cbor::from_reader(reader)?;
        if let Some(bad) = kv.vectors.values().find(|v| v.len() != kv.dim) {
            return Err(DocSimError::DimensionMismatch {
                expected: kv.dim,
                found: bad.len(),
            });
        }
        Ok(kv)
    }
}

/// First line that may be a word2vec `count dim` header
struct HeaderCandidate {
    line: usize,
    term: String,
    value: String,
    count: usize,
    dim: usize,
}

impl HeaderCandidate {
    fn push_as_row(self, kv: &mut Option<KeyedVectors>) -> Result<()> {
        push_row(kv, self.line, &self.term, &[self.value.as_str()])
    }
}

fn push_row(kv: &mut Option<KeyedVectors>, line_no: usize, term: &str, values: &[&str]) -> Result<()> {
    let vector = values
        .iter()
        .map(|v| v.parse::<f32>())
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|e| DocSimError::MalformedVectors {
            line: line_no,
            reason: format!("bad float: {}", e),
        })?;
    if vector.is_empty() {
        return Err(DocSimError::MalformedVectors {
            line: line_no,
            reason: format!("no values for term {:?}", term),
        });
    }

    let kv = kv.get_or_insert_with(|| KeyedVectors::new(vector.len()));
    if vector.len() != kv.dim {
        return Err(DocSimError::MalformedVectors {
            line: line_no,
            reason: format!("expected {} values, found {}", kv.dim, vector.len()),
        });
    }
    kv.vectors.insert(term.into(), vector);
    Ok(())
}

impl EmbeddingCapability for KeyedVectors {
    #[inline]
    fn vector_for(&self, term: &str) -> Option<Cow<'_, [f32]>> {
        self.vectors.get(term).map(|v| Cow::Borrowed(v.as_slice()))
    }

    #[inline]
    fn dim(&self) -> usize {
        self.dim
    }
}

impl<T> EmbeddingCapability for Arc<T>
where
    T: EmbeddingCapability + ?Sized,
{
    #[inline]
    fn vector_for(&self, term: &str) -> Option<Cow<'_, [f32]>> {
        (**self).vector_for(term)
    }

    #[inline]
    fn dim(&self) -> usize {
        (**self).dim()
    }
}
