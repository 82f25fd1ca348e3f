//! Plain homological percolation.
//!
//! Plaquettes enter in a fully uniform order until the first essential class
//! of their dimension is born. The birth time is the measured quantity; the
//! cocycle is resampled on everything inserted up to it.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::{Model, PercolationRecord, Spins, State};
use crate::arithmetic::FieldElement;
use crate::homology::{Filtration, PercolationOutcome, PersistenceTracker};
use crate::potts_error::PottsError;
use crate::topology::{BoundaryMatrix, CubicalComplex};

pub struct HomologicalPercolation {
    spins: Spins,
    tracker: PersistenceTracker,
    rng: SmallRng,
}

impl HomologicalPercolation {
    pub fn new(
        complex: Arc<CubicalComplex>,
        homology: usize,
        seed: u64,
    ) -> Result<Self, PottsError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tracker = PersistenceTracker::new(complex.clone(), homology)?;
        let spins = Spins::new(complex, homology, &mut rng)?;
        Ok(Self {
            spins,
            tracker,
            rng,
        })
    }

    pub fn with_initial(mut self, cocycle: Vec<FieldElement>) -> Result<Self, PottsError> {
        self.spins.set_initial(cocycle)?;
        Ok(self)
    }

    /// Percolate on the `n`-th essential class (default 1).
    pub fn with_essential_required(mut self, n: usize) -> Self {
        self.tracker = self.tracker.with_essential_required(n);
        self
    }

    pub fn tracker(&self) -> &PersistenceTracker {
        &self.tracker
    }
}

/// Turn a tracker outcome into an emitted state.
pub(crate) fn state_from_outcome(outcome: PercolationOutcome, candidates: usize) -> State {
    State {
        cocycle: outcome.cocycle,
        occupied: outcome.occupied,
        candidates,
        percolation: Some(PercolationRecord {
            birth: outcome.birth,
            birth_cell: outcome.birth_cell,
            filtration_length: outcome.filtration_length,
            essential: outcome.essential,
            satisfied: outcome.satisfied,
        }),
    }
}

impl Model for HomologicalPercolation {
    fn name(&self) -> &'static str {
        "homological-percolation"
    }

    fn complex(&self) -> &Arc<CubicalComplex> {
        &self.spins.complex
    }

    fn homology(&self) -> usize {
        self.spins.homology
    }

    fn boundary(&self) -> &BoundaryMatrix {
        &self.spins.boundary
    }

    fn initial(&mut self) -> State {
        self.spins.initial_state()
    }

    fn proposal(&mut self, step: usize) -> Result<State, PottsError> {
        let outcome = self.tracker.essential_cycles_born(
            Filtration::Uniform,
            &self.spins.state.cocycle,
            &mut self.rng,
        )?;
        log::trace!("step {step}: essential birth at {:?}", outcome.birth);
        Ok(state_from_outcome(outcome, self.spins.satisfied.len()))
    }

    fn assign(&mut self, state: &State) {
        self.spins.assign(state);
    }

    fn state(&self) -> &State {
        &self.spins.state
    }

    fn satisfied(&self) -> &[bool] {
        &self.spins.satisfied
    }
}

impl std::fmt::Debug for HomologicalPercolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomologicalPercolation")
            .field("homology", &self.spins.homology)
            .field("essential_required", &self.tracker.essential_required())
            .field("state", &self.spins.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn births_fall_inside_the_filtration() {
        let c = Arc::new(CubicalComplex::build(&[3, 3], 2, None, true).unwrap());
        let mut m = HomologicalPercolation::new(c.clone(), 1, 21).unwrap();
        for step in 1..=10 {
            let s = m.proposal(step).unwrap();
            let rec = s.percolation.as_ref().unwrap();
            let birth = rec.birth.unwrap();
            assert!(birth < c.len());
            // the birth plaquette is the last occupied one
            assert_eq!(s.occupied.last().copied(), rec.birth_cell);
            assert_eq!(rec.essential_count(), 2);
            m.assign(&s);
        }
    }

    #[test]
    fn same_seed_same_births() {
        let c = Arc::new(CubicalComplex::build(&[2, 2, 2], 3, None, true).unwrap());
        let run = |seed| {
            let mut m = HomologicalPercolation::new(c.clone(), 2, seed).unwrap();
            (1..=5)
                .map(|step| {
                    let s = m.proposal(step).unwrap();
                    m.assign(&s);
                    s.percolation.unwrap().birth
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(6), run(6));
    }
}
