use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermFrequency
/// Counts how often each term occurs in one token sequence.
/// Terms keep first-seen order.
///
/// # Examples
/// ```
/// use docsim::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_tokens(&["red", "car", "red"]);
///
/// assert_eq!(freq.token_count("red"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<Box<str>, u32>,
    total_token_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    pub fn from_tokens<T>(tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        freq.add_tokens(tokens);
        freq
    }

    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        match self.token_count.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.token_count.insert(token.into(), 1);
            }
        }
        self.total_token_count += 1;
        self
    }

    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// Occurrences of `token`, 0 when absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// Total number of tokens added
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_count.contains_key(token)
    }

    /// Distinct terms in first-seen order
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|t| t.as_ref()).collect()
    }

    /// `(term, count)` in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(t, &c)| (t.as_ref(), c))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_token_count == 0
    }
}
