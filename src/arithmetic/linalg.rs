//! Dense linear algebra over GF(q): row reduction, null spaces and uniform
//! kernel sampling.
//!
//! All routines are exact. Row reduction picks the first nonzero entry in
//! each column as pivot, so results are deterministic for a given matrix.

use rand::Rng;

use super::field::{FieldElement, FiniteField};
use crate::potts_error::PottsError;

/// Row-major dense matrix over a finite field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<FieldElement>,
}

impl DenseMatrix {
    /// All-zero `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from explicit rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<FieldElement>]) -> Result<Self, PottsError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            if r.len() != cols {
                return Err(PottsError::DimensionMismatch {
                    expected: cols,
                    found: r.len(),
                });
            }
            data.extend_from_slice(r);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> FieldElement {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: FieldElement) {
        self.data[r * self.cols + c] = value;
    }

    /// Borrow row `r`.
    pub fn row(&self, r: usize) -> &[FieldElement] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.set(c, r, self.get(r, c));
            }
        }
        t
    }

    /// Submatrix made of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self, PottsError> {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &r in rows {
            if r >= self.rows {
                return Err(PottsError::DimensionMismatch {
                    expected: self.rows,
                    found: r + 1,
                });
            }
            data.extend_from_slice(self.row(r));
        }
        Ok(Self {
            rows: rows.len(),
            cols: self.cols,
            data,
        })
    }

    /// `self · v`.
    pub fn mul_vec(
        &self,
        field: &FiniteField,
        v: &[FieldElement],
    ) -> Result<Vec<FieldElement>, PottsError> {
        if v.len() != self.cols {
            return Err(PottsError::DimensionMismatch {
                expected: self.cols,
                found: v.len(),
            });
        }
        Ok((0..self.rows).map(|r| field.dot(self.row(r), v)).collect())
    }

    /// Reduce in place to reduced row echelon form; returns pivot columns,
    /// one per nonzero row, in row order.
    pub fn rref(&mut self, field: &FiniteField) -> Vec<usize> {
        let mut pivots = Vec::new();
        let mut lead = 0;
        for c in 0..self.cols {
            if lead == self.rows {
                break;
            }
            let Some(pr) = (lead..self.rows).find(|&r| self.get(r, c) != 0) else {
                continue;
            };
            if pr != lead {
                for k in 0..self.cols {
                    self.data.swap(pr * self.cols + k, lead * self.cols + k);
                }
            }
            // pivot is nonzero by construction
            let inv = field.inv(self.get(lead, c)).unwrap_or(1);
            for k in c..self.cols {
                let x = self.get(lead, k);
                self.set(lead, k, field.mul(x, inv));
            }
            for r in 0..self.rows {
                if r == lead {
                    continue;
                }
                let factor = self.get(r, c);
                if factor == 0 {
                    continue;
                }
                let neg = field.neg(factor);
                for k in c..self.cols {
                    let updated = field.mul_add(self.get(r, k), neg, self.get(lead, k));
                    self.set(r, k, updated);
                }
            }
            pivots.push(c);
            lead += 1;
        }
        pivots
    }

    pub fn rank(&self, field: &FiniteField) -> usize {
        self.clone().rref(field).len()
    }

    /// Basis of `{ v : self · v = 0 }`, one vector per free column.
    pub fn null_space(&self, field: &FiniteField) -> Vec<Vec<FieldElement>> {
        let mut reduced = self.clone();
        let pivots = reduced.rref(field);
        let free = free_columns(self.cols, &pivots);
        free.iter()
            .map(|&f| {
                let mut v = vec![0; self.cols];
                v[f] = 1;
                for (row, &pc) in pivots.iter().enumerate() {
                    v[pc] = field.neg(reduced.get(row, f));
                }
                v
            })
            .collect()
    }
}

fn free_columns(cols: usize, pivots: &[usize]) -> Vec<usize> {
    let mut is_pivot = vec![false; cols];
    for &p in pivots {
        is_pivot[p] = true;
    }
    (0..cols).filter(|&c| !is_pivot[c]).collect()
}

/// Uniformly random element of the kernel of the coboundary restricted to the
/// rows in `includes`.
///
/// Each free variable of the reduced system is drawn uniformly and the pivot
/// variables are solved for, which is the same distribution as a uniformly
/// weighted combination of a null-space basis. With an empty `includes` every
/// spin is unconstrained.
pub fn sample_from_kernel<R: Rng + ?Sized>(
    coboundary: &DenseMatrix,
    field: &FiniteField,
    includes: &[usize],
    rng: &mut R,
) -> Result<Vec<FieldElement>, PottsError> {
    let mut restricted = coboundary.select_rows(includes)?;
    let pivots = restricted.rref(field);
    let free = free_columns(coboundary.ncols(), &pivots);
    if free.is_empty() && coboundary.ncols() > 0 {
        log::trace!(
            "kernel of {}x{} restriction is trivial",
            includes.len(),
            coboundary.ncols()
        );
    }
    let mut v = vec![0; coboundary.ncols()];
    for &f in &free {
        v[f] = field.random(rng);
    }
    for (row, &pc) in pivots.iter().enumerate() {
        let acc = free
            .iter()
            .fold(0, |acc, &f| field.mul_add(acc, restricted.get(row, f), v[f]));
        v[pc] = field.neg(acc);
    }
    Ok(v)
}

/// Like [`sample_from_kernel`] but insists on a nonzero result.
///
/// # Errors
/// [`PottsError::DegenerateKernel`] when the restricted kernel is `{0}`.
pub fn sample_nonzero_from_kernel<R: Rng + ?Sized>(
    coboundary: &DenseMatrix,
    field: &FiniteField,
    includes: &[usize],
    rng: &mut R,
) -> Result<Vec<FieldElement>, PottsError> {
    let restricted = coboundary.select_rows(includes)?;
    if restricted.rank(field) == coboundary.ncols() {
        return Err(PottsError::DegenerateKernel {
            rows: includes.len(),
            columns: coboundary.ncols(),
        });
    }
    loop {
        let v = sample_from_kernel(coboundary, field, includes, rng)?;
        if v.iter().any(|&x| x != 0) {
            return Ok(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn gf(q: u32) -> FiniteField {
        FiniteField::new(q).unwrap()
    }

    #[test]
    fn rref_of_identity_is_identity() {
        let f = gf(5);
        let mut m = DenseMatrix::from_rows(&[vec![1, 0], vec![0, 1]]).unwrap();
        assert_eq!(m.rref(&f), vec![0, 1]);
        assert!(m.null_space(&f).is_empty());
    }

    #[test]
    fn null_space_vectors_are_annihilated() {
        let f = gf(3);
        let m = DenseMatrix::from_rows(&[vec![1, 2, 0, 1], vec![2, 1, 1, 0], vec![0, 0, 1, 1]])
            .unwrap();
        let basis = m.null_space(&f);
        assert_eq!(basis.len(), 4 - m.rank(&f));
        for v in basis {
            assert!(m.mul_vec(&f, &v).unwrap().iter().all(|&x| x == 0));
        }
    }

    #[test]
    fn kernel_samples_satisfy_restricted_rows() {
        let f = gf(2);
        // path graph coboundary: edges x vertices
        let m = DenseMatrix::from_rows(&[vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![0, 0, 1, 1]])
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let v = sample_from_kernel(&m, &f, &[0, 2], &mut rng).unwrap();
            assert_eq!(v[0], v[1]);
            assert_eq!(v[2], v[3]);
        }
    }

    #[test]
    fn kernel_samples_are_roughly_uniform() {
        let f = gf(3);
        let m = DenseMatrix::from_rows(&[vec![1, 2]]).unwrap();
        // kernel: v0 = v1 over GF(3) (1 + 2 = 0), three solutions
        let mut rng = SmallRng::seed_from_u64(11);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let v = sample_from_kernel(&m, &f, &[0], &mut rng).unwrap();
            assert_eq!(v[0], v[1]);
            counts[v[0] as usize] += 1;
        }
        assert!(counts.iter().all(|&c| (800..1200).contains(&c)), "{counts:?}");
    }

    #[test]
    fn degenerate_kernel_is_reported() {
        let f = gf(2);
        let m = DenseMatrix::from_rows(&[vec![1, 0], vec![0, 1]]).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let err = sample_nonzero_from_kernel(&m, &f, &[0, 1], &mut rng).unwrap_err();
        assert_eq!(err, PottsError::DegenerateKernel { rows: 2, columns: 2 });
        let v = sample_nonzero_from_kernel(&m, &f, &[0], &mut rng).unwrap();
        assert_eq!(v, vec![0, 1]);
    }

    #[test]
    fn out_of_range_rows_are_rejected() {
        let m = DenseMatrix::zeros(2, 2);
        assert!(matches!(
            m.select_rows(&[5]),
            Err(PottsError::DimensionMismatch { .. })
        ));
    }
}
