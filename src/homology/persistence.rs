//! Persistence reduction over GF(q) and essential-cycle detection.
//!
//! [`PersistenceTracker::reduce`] runs the standard column algorithm on the
//! boundary matrix permuted into insertion order. A column that reduces to
//! zero opens a class of its own dimension; a nonzero column closes the class
//! opened at its low position. Classes never closed are essential.
//!
//! [`PersistenceTracker::essential_cycles_born`] draws an insertion order,
//! reduces it, takes the birth of the requested essential plaquette class as
//! the percolation event and resamples the cocycle on everything inserted up
//! to that event.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;

use super::filtration::{Filtration, InsertionOrder};
use crate::arithmetic::{DenseMatrix, FieldElement, FiniteField, sample_from_kernel};
use crate::potts_error::PottsError;
use crate::topology::{BoundaryMatrix, CubicalComplex};

/// Sparse column keyed by filtration position.
type Column = BTreeMap<usize, FieldElement>;

/// `col += factor · other`, dropping entries that cancel.
fn add_scaled(col: &mut Column, other: &Column, factor: FieldElement, field: &FiniteField) {
    for (&row, &v) in other {
        let updated = field.mul_add(col.get(&row).copied().unwrap_or(0), factor, v);
        if updated == 0 {
            col.remove(&row);
        } else {
            col.insert(row, updated);
        }
    }
}

/// One homology class of the filtration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PersistencePair {
    /// Dimension of the class.
    pub dimension: usize,
    /// Filtration position of the cell that opened it.
    pub birth: usize,
    /// Filtration position of the cell that closed it; `None` if essential.
    pub death: Option<usize>,
    /// Global index of the birth cell.
    pub cell: usize,
}

impl PersistencePair {
    #[inline]
    pub fn is_essential(&self) -> bool {
        self.death.is_none()
    }
}

/// All classes of one reduction, ordered by birth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistencePairs {
    pairs: Vec<PersistencePair>,
    columns_reduced: usize,
    additions: usize,
}

impl PersistencePairs {
    #[inline]
    pub fn pairs(&self) -> &[PersistencePair] {
        &self.pairs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Essential classes of dimension `dim`, by birth.
    pub fn essential(&self, dim: usize) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.pairs
            .iter()
            .filter(move |p| p.dimension == dim && p.is_essential())
    }

    /// Rank of `H_dim` of the whole filtered complex.
    pub fn betti_at_end(&self, dim: usize) -> usize {
        self.essential(dim).count()
    }

    /// Number of column additions the reduction performed.
    #[inline]
    pub fn additions(&self) -> usize {
        self.additions
    }

    #[inline]
    pub fn columns_reduced(&self) -> usize {
        self.columns_reduced
    }
}

/// Result of one percolation proposal.
#[derive(Clone, Debug, PartialEq)]
pub struct PercolationOutcome {
    /// Cocycle sampled from the kernel restricted to `occupied`.
    pub cocycle: Vec<FieldElement>,
    /// Local plaquette indices inserted up to and including the birth, in
    /// insertion order.
    pub occupied: Vec<usize>,
    /// Per plaquette: its insertion opened an essential class.
    pub essential: Vec<bool>,
    /// Per plaquette: satisfied by the cocycle the proposal started from.
    pub satisfied: Vec<bool>,
    /// Filtration position of the percolation event.
    pub birth: Option<usize>,
    /// Local index of the plaquette whose insertion percolated.
    pub birth_cell: Option<usize>,
    /// Number of cells in the filtration.
    pub filtration_length: usize,
    pub pairs: PersistencePairs,
}

impl PercolationOutcome {
    #[inline]
    pub fn percolated(&self) -> bool {
        self.birth.is_some()
    }
}

/// Percolation detector for one homology dimension of a shared complex.
#[derive(Clone, Debug)]
pub struct PersistenceTracker {
    complex: Arc<CubicalComplex>,
    homology: usize,
    boundary: BoundaryMatrix,
    coboundary: DenseMatrix,
    essential_required: usize,
}

impl PersistenceTracker {
    /// # Errors
    /// [`PottsError::InvalidHomology`] unless `1 <= homology <= dimension`.
    pub fn new(complex: Arc<CubicalComplex>, homology: usize) -> Result<Self, PottsError> {
        if homology == 0 || homology > complex.dimension() {
            return Err(PottsError::InvalidHomology {
                homology,
                dimension: complex.dimension(),
            });
        }
        let boundary = complex.boundary(homology);
        let coboundary = boundary.coboundary_dense();
        Ok(Self {
            complex,
            homology,
            boundary,
            coboundary,
            essential_required: 1,
        })
    }

    /// Percolate on the `n`-th essential class instead of the first.
    pub fn with_essential_required(mut self, n: usize) -> Self {
        self.essential_required = n.max(1);
        self
    }

    #[inline]
    pub fn homology(&self) -> usize {
        self.homology
    }

    #[inline]
    pub fn essential_required(&self) -> usize {
        self.essential_required
    }

    #[inline]
    pub fn complex(&self) -> &Arc<CubicalComplex> {
        &self.complex
    }

    /// Boundary from plaquettes to spin cells.
    #[inline]
    pub fn boundary(&self) -> &BoundaryMatrix {
        &self.boundary
    }

    /// Dense coboundary from spin cells to plaquettes.
    #[inline]
    pub fn coboundary(&self) -> &DenseMatrix {
        &self.coboundary
    }

    /// Reduce the boundary matrix of the inserted cells in insertion order.
    pub fn reduce(&self, order: &InsertionOrder) -> PersistencePairs {
        let complex = &*self.complex;
        let field = complex.field();
        let minus_one = field.from_int(-1);
        let n = order.len();

        let mut reduced: Vec<Column> = Vec::with_capacity(n);
        let mut owner: Vec<Option<usize>> = vec![None; n];
        let mut additions = 0usize;

        for &g in order.cells() {
            let mut col: Column = complex
                .cell(g)
                .signed_faces()
                .filter_map(|(f, s)| {
                    order
                        .position(f)
                        .map(|p| (p, if s > 0 { 1 } else { minus_one }))
                })
                .collect();
            while let Some((&low, &value)) = col.last_key_value() {
                let Some(j) = owner[low] else { break };
                let pivot = &reduced[j];
                let Some(ratio) = pivot.get(&low).and_then(|&pv| field.div(value, pv)) else {
                    break;
                };
                add_scaled(&mut col, pivot, field.neg(ratio), field);
                additions += 1;
            }
            if let Some((&low, _)) = col.last_key_value() {
                owner[low] = Some(reduced.len());
            }
            reduced.push(col);
        }

        let tranches = complex.tranches();
        let pairs = order
            .cells()
            .iter()
            .enumerate()
            .filter(|&(pos, _)| reduced[pos].is_empty())
            .map(|(pos, &g)| PersistencePair {
                dimension: tranches.dimension_of(g),
                birth: pos,
                death: owner[pos],
                cell: g,
            })
            .collect();

        log::trace!("reduced {n} columns with {additions} additions");
        PersistencePairs {
            pairs,
            columns_reduced: n,
            additions,
        }
    }

    /// Draw an insertion order, detect the birth of an essential plaquette
    /// class and resample the cocycle on the occupied plaquettes.
    ///
    /// # Errors
    /// [`PottsError::DimensionMismatch`] if `cocycle` does not have one entry
    /// per spin cell.
    pub fn essential_cycles_born<R: Rng + ?Sized>(
        &self,
        filtration: Filtration,
        cocycle: &[FieldElement],
        rng: &mut R,
    ) -> Result<PercolationOutcome, PottsError> {
        let complex = &*self.complex;
        let h = self.homology;
        let satisfied = self.boundary.satisfied(complex.field(), cocycle)?;
        let plaquettes = complex.tranches().range(h);

        if plaquettes.is_empty() {
            log::warn!("no {h}-cells to percolate through");
            return Ok(PercolationOutcome {
                cocycle: cocycle.to_vec(),
                occupied: Vec::new(),
                essential: Vec::new(),
                satisfied,
                birth: None,
                birth_cell: None,
                filtration_length: 0,
                pairs: PersistencePairs::default(),
            });
        }

        let order = InsertionOrder::draw(complex, h, filtration, &satisfied, rng);
        let pairs = self.reduce(&order);

        let mut essential = vec![false; plaquettes.len()];
        for p in pairs.essential(h) {
            essential[p.cell - plaquettes.start] = true;
        }
        let event = pairs.essential(h).nth(self.essential_required - 1).copied();
        let birth = event.map(|p| p.birth);
        if birth.is_none() {
            log::debug!(
                "no essential {h}-class #{} born; occupying every plaquette",
                self.essential_required
            );
        }

        let occupied: Vec<usize> = order
            .cells()
            .iter()
            .enumerate()
            .take_while(|&(pos, _)| birth.is_none_or(|b| pos <= b))
            .filter(|&(_, g)| plaquettes.contains(g))
            .map(|(_, &g)| g - plaquettes.start)
            .collect();

        let next = sample_from_kernel(&self.coboundary, complex.field(), &occupied, rng)?;
        log::trace!(
            "percolation at {:?} of {} with {} occupied plaquettes",
            birth,
            order.len(),
            occupied.len()
        );
        Ok(PercolationOutcome {
            cocycle: next,
            occupied,
            essential,
            satisfied,
            birth,
            birth_cell: event.map(|p| p.cell - plaquettes.start),
            filtration_length: order.len(),
            pairs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn tracker(corners: &[usize], q: u32, periodic: bool, h: usize) -> PersistenceTracker {
        let c = CubicalComplex::build(corners, q, None, periodic).unwrap();
        PersistenceTracker::new(Arc::new(c), h).unwrap()
    }

    #[test]
    fn torus_homology_ranks() {
        for q in [2, 3, 4] {
            let t = tracker(&[2, 3], q, true, 1);
            let mut rng = SmallRng::seed_from_u64(2);
            let order = InsertionOrder::draw(t.complex(), 1, Filtration::Uniform, &[], &mut rng);
            let pairs = t.reduce(&order);
            assert_eq!(pairs.betti_at_end(0), 1);
            assert_eq!(pairs.betti_at_end(1), 2);
            assert_eq!(pairs.betti_at_end(2), 1);
        }
    }

    #[test]
    fn open_square_has_no_essential_loops() {
        let t = tracker(&[3, 3], 3, false, 1);
        let spins = vec![0; t.complex().count(0)];
        let mut rng = SmallRng::seed_from_u64(4);
        let out = t
            .essential_cycles_born(Filtration::Uniform, &spins, &mut rng)
            .unwrap();
        assert_eq!(out.birth, None);
        assert_eq!(out.occupied.len(), t.complex().count(1));
        assert!(out.essential.iter().all(|&e| !e));
        // every edge occupied: the cocycle is constant
        assert!(out.cocycle.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn occupied_plaquettes_are_satisfied_by_the_new_cocycle() {
        let t = tracker(&[3, 3], 5, true, 1);
        let field = t.complex().field().clone();
        let mut rng = SmallRng::seed_from_u64(8);
        let mut spins = field.random_vector(t.complex().count(0), &mut rng);
        for _ in 0..20 {
            let out = t
                .essential_cycles_born(Filtration::SatisfiedFirst, &spins, &mut rng)
                .unwrap();
            let birth = out.birth.expect("torus always percolates");
            assert!(birth < out.filtration_length);
            let sat = t.boundary().satisfied(&field, &out.cocycle).unwrap();
            assert!(out.occupied.iter().all(|&p| sat[p]));
            assert!(out.essential[out.birth_cell.unwrap()]);
            spins = out.cocycle;
        }
    }

    #[test]
    fn second_essential_class_comes_later() {
        let t = tracker(&[2, 2], 2, true, 1);
        let t2 = t.clone().with_essential_required(2);
        let spins = vec![0; 9];
        let a = t
            .essential_cycles_born(Filtration::Uniform, &spins, &mut SmallRng::seed_from_u64(3))
            .unwrap();
        let b = t2
            .essential_cycles_born(Filtration::Uniform, &spins, &mut SmallRng::seed_from_u64(3))
            .unwrap();
        assert!(b.birth.unwrap() > a.birth.unwrap());
        assert_eq!(a.pairs, b.pairs);
    }

    #[test]
    fn homology_must_fit_the_complex() {
        let c = Arc::new(CubicalComplex::build(&[2, 2], 2, None, true).unwrap());
        assert!(matches!(
            PersistenceTracker::new(c.clone(), 0),
            Err(PottsError::InvalidHomology { .. })
        ));
        assert!(PersistenceTracker::new(c, 3).is_err());
    }

    #[test]
    fn wrong_cocycle_length_is_rejected() {
        let t = tracker(&[2, 2], 2, true, 1);
        let err = t
            .essential_cycles_born(Filtration::Uniform, &[0, 1], &mut SmallRng::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err, PottsError::DimensionMismatch { expected: 9, found: 2 });
    }
}
