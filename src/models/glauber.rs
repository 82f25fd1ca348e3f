//! Single-spin Glauber proposals.
//!
//! One uniformly chosen spin is shifted by a uniformly random nonzero field
//! element. The acceptance rule of the chain (usually Metropolis) decides.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{Model, Spins, State};
use crate::arithmetic::FieldElement;
use crate::potts_error::PottsError;
use crate::topology::{BoundaryMatrix, CubicalComplex};

#[derive(Clone, Debug)]
pub struct Glauber {
    spins: Spins,
    rng: SmallRng,
}

impl Glauber {
    pub fn new(
        complex: Arc<CubicalComplex>,
        homology: usize,
        seed: u64,
    ) -> Result<Self, PottsError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let spins = Spins::new(complex, homology, &mut rng)?;
        Ok(Self { spins, rng })
    }

    pub fn with_initial(mut self, cocycle: Vec<FieldElement>) -> Result<Self, PottsError> {
        self.spins.set_initial(cocycle)?;
        Ok(self)
    }
}

impl Model for Glauber {
    fn name(&self) -> &'static str {
        "glauber"
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
        let mut cocycle = self.spins.state.cocycle.clone();
        if cocycle.is_empty() {
            return Ok(State::from_cocycle(cocycle));
        }
        let field = self.spins.complex.field();
        let site = self.rng.gen_range(0..cocycle.len());
        let shift = field.random_nonzero(&mut self.rng);
        cocycle[site] = field.add(cocycle[site], shift);
        log::trace!("step {step}: spin {site} shifted by {shift}");
        Ok(State::from_cocycle(cocycle))
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
