use std::cmp::Ordering;

use num::Num;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Dot product with another sparse vector, merged over stored indices
    ///
    /// # Arguments
    /// * `other` - the other vector, element type may differ
    ///
    /// # Returns
    /// * `f64` - Σ(a_i * b_i)
    #[inline]
    pub fn dot<M>(&self, other: &ZeroSpVec<M>) -> f64
    where
        M: Num + Copy + Into<f64>,
    {
        let (a_inds, a_vals) = (self.indices(), self.values());
        let (b_inds, b_vals) = (other.indices(), other.values());
        let mut result = 0_f64;
        let mut i = 0;
        let mut j = 0;
        while i < a_inds.len() && j < b_inds.len() {
            match a_inds[i].cmp(&b_inds[j]) {
                Ordering::Equal => {
                    result += a_vals[i].into() * b_vals[j].into();
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// Σ(a_i^2)
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.values()
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum()
    }
}
