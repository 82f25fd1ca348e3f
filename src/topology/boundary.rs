//! Sparse signed boundary operators and their dense coboundary transposes.
//!
//! Column `j` of the dimension-`t` boundary lists the `(t-1)`-faces of the
//! `j`-th `t`-cell with their incidence mapped into the field (`-1 ↦ q-1`
//! for prime fields, `p-1` in general). Row and column indices are local to
//! their tranche.

use super::complex::CubicalComplex;
use crate::arithmetic::{DenseMatrix, FieldElement, FiniteField};
use crate::potts_error::PottsError;

/// Boundary operator `∂_t : C_t → C_{t-1}` in column-sparse form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryMatrix {
    dimension: usize,
    rows: usize,
    columns: Vec<Vec<(usize, FieldElement)>>,
}

impl BoundaryMatrix {
    pub(crate) fn from_complex(complex: &CubicalComplex, t: usize) -> Self {
        let field = complex.field();
        let tranches = complex.tranches();
        let minus_one = field.from_int(-1);
        let rows = if t == 0 { 0 } else { complex.count(t - 1) };
        let columns = complex
            .cells_of(t)
            .iter()
            .map(|cell| {
                let mut col: Vec<(usize, FieldElement)> = cell
                    .signed_faces()
                    .map(|(f, s)| (tranches.local(f), if s > 0 { 1 } else { minus_one }))
                    .collect();
                col.sort_unstable_by_key(|&(r, _)| r);
                col
            })
            .collect();
        Self {
            dimension: t,
            rows,
            columns,
        }
    }

    /// Dimension of the source cells.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Nonzero `(row, coefficient)` entries of column `j`, sorted by row.
    #[inline]
    pub fn column(&self, j: usize) -> &[(usize, FieldElement)] {
        &self.columns[j]
    }

    /// Dense `rows × cols` form of `∂_t`.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut m = DenseMatrix::zeros(self.rows, self.columns.len());
        for (j, col) in self.columns.iter().enumerate() {
            for &(r, c) in col {
                m.set(r, j, c);
            }
        }
        m
    }

    /// Dense coboundary `δ^{t-1} = ∂_tᵀ`: one row per `t`-cell.
    pub fn coboundary_dense(&self) -> DenseMatrix {
        let mut m = DenseMatrix::zeros(self.columns.len(), self.rows);
        for (j, col) in self.columns.iter().enumerate() {
            for &(r, c) in col {
                m.set(j, r, c);
            }
        }
        m
    }

    /// `(δ cochain)(σ)` for every `t`-cell `σ`.
    pub fn evaluate(
        &self,
        field: &FiniteField,
        cochain: &[FieldElement],
    ) -> Result<Vec<FieldElement>, PottsError> {
        if cochain.len() != self.rows {
            return Err(PottsError::DimensionMismatch {
                expected: self.rows,
                found: cochain.len(),
            });
        }
        Ok(self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .fold(0, |acc, &(r, c)| field.mul_add(acc, c, cochain[r]))
            })
            .collect())
    }

    /// Which `t`-cells have a vanishing coboundary value.
    pub fn satisfied(
        &self,
        field: &FiniteField,
        cochain: &[FieldElement],
    ) -> Result<Vec<bool>, PottsError> {
        Ok(self
            .evaluate(field, cochain)?
            .into_iter()
            .map(|x| x == 0)
            .collect())
    }

    /// Whether `lower ∘ self` is the zero map (`∂∂ = 0`).
    pub fn composes_to_zero(&self, lower: &BoundaryMatrix, field: &FiniteField) -> bool {
        if lower.ncols() != self.rows {
            return false;
        }
        let mut acc = vec![0; lower.nrows()];
        for col in &self.columns {
            acc.iter_mut().for_each(|x| *x = 0);
            for &(mid, c) in col {
                for &(r, d) in lower.column(mid) {
                    acc[r] = field.mul_add(acc[r], c, d);
                }
            }
            if acc.iter().any(|&x| x != 0) {
                return false;
            }
        }
        true
    }
}

/// Value of `cocycle` on the boundary of every top cell of `boundary`.
pub fn evaluate_cochain(
    boundary: &BoundaryMatrix,
    field: &FiniteField,
    cocycle: &[FieldElement],
) -> Result<Vec<FieldElement>, PottsError> {
    boundary.evaluate(field, cocycle)
}
