//! Skeleton index: contiguous per-dimension index ranges ("tranches").
//!
//! Cells of a complex are stored dimension by dimension, so the k-skeleton's
//! k-cells occupy one contiguous range of global indices. This module provides:
//! 1. [`Tranches`]: the ranges themselves, with O(1) conversion between a
//!    global index and `(dimension, local index)`.
//! 2. The invariant check that the ranges partition `[0, N)` in increasing
//!    dimension order.

use std::ops::Range;

use crate::debug_invariants::DebugInvariants;
use crate::potts_error::PottsError;

/// Contiguous index ranges per dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tranches {
    /// `starts[k]..starts[k+1]` is the tranche of dimension `k`.
    starts: Vec<usize>,
    /// Dimension of each global index.
    dimension_of: Vec<u8>,
}

impl Tranches {
    /// Build from per-dimension cell counts (dimension 0 first).
    pub fn from_counts(counts: &[usize]) -> Self {
        let mut starts = Vec::with_capacity(counts.len() + 1);
        let mut dimension_of = Vec::with_capacity(counts.iter().sum());
        starts.push(0);
        for (k, &n) in counts.iter().enumerate() {
            starts.push(starts[k] + n);
            dimension_of.extend(std::iter::repeat_n(k as u8, n));
        }
        Self {
            starts,
            dimension_of,
        }
    }

    /// Highest dimension with a tranche (possibly empty).
    #[inline]
    pub fn top_dimension(&self) -> usize {
        self.starts.len().saturating_sub(2)
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        *self.starts.last().unwrap_or(&0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Global index range of dimension `k`; empty above the top dimension.
    pub fn range(&self, k: usize) -> Range<usize> {
        if k + 1 < self.starts.len() {
            self.starts[k]..self.starts[k + 1]
        } else {
            let n = self.len();
            n..n
        }
    }

    /// Number of cells of dimension `k`.
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.range(k).len()
    }

    /// Per-dimension counts, dimension 0 first.
    pub fn counts(&self) -> Vec<usize> {
        (0..=self.top_dimension()).map(|k| self.count(k)).collect()
    }

    /// Dimension of a global index.
    #[inline]
    pub fn dimension_of(&self, index: usize) -> usize {
        self.dimension_of[index] as usize
    }

    /// Position of a global index inside its tranche.
    #[inline]
    pub fn local(&self, index: usize) -> usize {
        index - self.starts[self.dimension_of(index)]
    }

    /// Global index of the `local`-th cell of dimension `k`.
    #[inline]
    pub fn global(&self, k: usize, local: usize) -> usize {
        self.starts[k] + local
    }
}

impl DebugInvariants for Tranches {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Tranches");
    }

    fn validate_invariants(&self) -> Result<(), PottsError> {
        if self.starts.first() != Some(&0) {
            return Err(PottsError::DimensionMismatch {
                expected: 0,
                found: self.starts.first().copied().unwrap_or(usize::MAX),
            });
        }
        for w in self.starts.windows(2) {
            if w[1] < w[0] {
                return Err(PottsError::DimensionMismatch {
                    expected: w[0],
                    found: w[1],
                });
            }
        }
        if self.dimension_of.len() != self.len() {
            return Err(PottsError::DimensionMismatch {
                expected: self.len(),
                found: self.dimension_of.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_partition_in_dimension_order() {
        let t = Tranches::from_counts(&[9, 18, 9]);
        assert_eq!(t.range(0), 0..9);
        assert_eq!(t.range(1), 9..27);
        assert_eq!(t.range(2), 27..36);
        assert_eq!(t.range(3), 36..36);
        assert_eq!(t.len(), 36);
        assert_eq!(t.top_dimension(), 2);
        assert!(t.validate_invariants().is_ok());
    }

    #[test]
    fn local_and_global_are_inverse() {
        let t = Tranches::from_counts(&[4, 4, 1]);
        for i in 0..t.len() {
            let k = t.dimension_of(i);
            assert_eq!(t.global(k, t.local(i)), i);
        }
        assert_eq!(t.dimension_of(8), 2);
        assert_eq!(t.local(5), 1);
    }
}
