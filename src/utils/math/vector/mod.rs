pub mod math;

use std::fmt::{self, Debug};

use num::Num;
use serde::{Deserialize, Serialize};

use crate::utils::sort::sort_by_index;

/// ZeroSpVec is a sparse vector whose implicit entries are zero.
/// It holds indices and values as two parallel arrays:
/// `inds` holds the positions of stored elements,
/// `vals` holds their values.
///
/// Stored elements are kept sorted by ascending index, with no duplicates
/// and no explicit zeros.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len: 0,
        }
    }

    /// All-zero vector of dimension `len`
    #[inline]
    pub fn with_len(len: usize) -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Values sharing an index are summed, zeros are dropped.
    /// `len` grows to cover the largest index when needed.
    pub fn from_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, N)>,
    {
        let (mut inds, mut vals): (Vec<u32>, Vec<N>) = pairs
            .into_iter()
            .map(|(idx, val)| (idx as u32, val))
            .unzip();
        sort_by_index(&mut inds, &mut vals);

        let mut out = ZeroSpVec::with_len(len);
        out.inds.reserve(inds.len());
        out.vals.reserve(vals.len());
        for (idx, val) in inds.into_iter().zip(vals) {
            match out.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = out.vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => {
                    out.inds.push(idx);
                    out.vals.push(val);
                }
            }
        }
        out.drop_zeros();
        if let Some(&last) = out.inds.last() {
            out.len = out.len.max(last as usize + 1);
        }
        out
    }

    /// Append an element at the end, growing the dimension by one.
    /// Zero elements only grow the dimension.
    #[inline]
    pub fn push(&mut self, elem: N) {
        if elem != N::zero() {
            self.inds.push(self.len as u32);
            self.vals.push(elem);
        }
        self.len += 1;
    }

    #[inline]
    pub fn from_vec(vec: Vec<N>) -> Self {
        let mut zero_sp_vec = ZeroSpVec::with_len(0);
        for entry in vec {
            zero_sp_vec.push(entry);
        }
        zero_sp_vec
    }

    /// Element at `index`; `None` only when out of range
    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    /// Stored elements in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, &N)> + '_ {
        self.inds.iter().map(|&i| i as usize).zip(self.vals.iter())
    }

    /// Every element including implicit zeros
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        (0..self.len).map(move |i| self.get(i).unwrap_or_else(N::zero))
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.vals
    }

    fn drop_zeros(&mut self) {
        let zero = N::zero();
        let mut keep = 0;
        for i in 0..self.inds.len() {
            if self.vals[i] != zero {
                self.inds[keep] = self.inds[i];
                self.vals[keep] = self.vals[i];
                keep += 1;
            }
        }
        self.inds.truncate(keep);
        self.vals.truncate(keep);
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    fn default() -> Self {
        ZeroSpVec::new()
    }
}

impl<N> Debug for ZeroSpVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "ZeroSpVec({:?})", self.iter().collect::<Vec<N>>())
        } else {
            f.debug_map().entries(self.raw_iter()).finish()
        }
    }
}
