//! Generalized Swendsen-Wang moves.
//!
//! Each satisfied plaquette joins the cluster with probability
//! `p = 1 - exp(T)`, and the next cocycle is drawn uniformly from the kernel
//! of the coboundary restricted to the cluster.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{Model, Spins, State};
use crate::arithmetic::{DenseMatrix, FieldElement, sample_from_kernel};
use crate::chain::schedules::{BoxedSchedule, TemperatureSchedule};
use crate::potts_error::PottsError;
use crate::topology::{BoundaryMatrix, CubicalComplex};

pub struct SwendsenWang {
    spins: Spins,
    coboundary: DenseMatrix,
    schedule: BoxedSchedule,
    rng: SmallRng,
}

impl SwendsenWang {
    pub fn new(
        complex: Arc<CubicalComplex>,
        homology: usize,
        schedule: impl TemperatureSchedule + Send + Sync + 'static,
        seed: u64,
    ) -> Result<Self, PottsError> {
        Self::with_schedule(complex, homology, Box::new(schedule), seed)
    }

    /// Like [`SwendsenWang::new`] with an already boxed schedule.
    pub fn with_schedule(
        complex: Arc<CubicalComplex>,
        homology: usize,
        schedule: BoxedSchedule,
        seed: u64,
    ) -> Result<Self, PottsError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let spins = Spins::new(complex, homology, &mut rng)?;
        let coboundary = spins.boundary.coboundary_dense();
        Ok(Self {
            spins,
            coboundary,
            schedule,
            rng,
        })
    }

    /// Start from a given cocycle instead of a random one.
    pub fn with_initial(mut self, cocycle: Vec<FieldElement>) -> Result<Self, PottsError> {
        self.spins.set_initial(cocycle)?;
        Ok(self)
    }

    /// Inclusion probability at `step`.
    ///
    /// # Errors
    /// [`PottsError::NumericalDomain`] when `1 - exp(T)` leaves `[0, 1]`.
    pub fn inclusion_probability(&self, step: usize) -> Result<f64, PottsError> {
        let temperature = self.schedule.temperature(step);
        let p = 1.0 - temperature.exp();
        if !(0.0..=1.0).contains(&p) {
            return Err(PottsError::NumericalDomain {
                probability: p,
                step,
            });
        }
        Ok(p)
    }
}

impl Model for SwendsenWang {
    fn name(&self) -> &'static str {
        "swendsen-wang"
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
        let p = self.inclusion_probability(step)?;
        let candidates = self.spins.satisfied_plaquettes();
        let rng = &mut self.rng;
        let included: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|_| rng.r#gen::<f64>() < p)
            .collect();
        let field = self.spins.complex.field();
        let cocycle = sample_from_kernel(&self.coboundary, field, &included, &mut self.rng)?;
        log::trace!(
            "step {step}: p = {p:.4}, included {} of {} satisfied plaquettes",
            included.len(),
            candidates.len()
        );
        Ok(State {
            cocycle,
            occupied: included,
            candidates: candidates.len(),
            percolation: None,
        })
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

impl std::fmt::Debug for SwendsenWang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwendsenWang")
            .field("homology", &self.spins.homology)
            .field("state", &self.spins.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::schedules::Constant;

    fn torus(q: u32) -> Arc<CubicalComplex> {
        Arc::new(CubicalComplex::build(&[2, 2], q, None, true).unwrap())
    }

    #[test]
    fn positive_temperature_is_a_domain_error() {
        let mut m = SwendsenWang::new(torus(2), 1, Constant(0.5), 0).unwrap();
        let err = m.proposal(3).unwrap_err();
        assert!(matches!(err, PottsError::NumericalDomain { step: 3, .. }));
        let mut nan = SwendsenWang::new(torus(2), 1, Constant(f64::NAN), 0).unwrap();
        assert!(nan.proposal(1).is_err());
    }

    #[test]
    fn included_plaquettes_stay_satisfied() {
        let mut m = SwendsenWang::new(torus(5), 1, Constant(-1.2), 4).unwrap();
        for step in 1..50 {
            let before = m.satisfied().to_vec();
            let s = m.proposal(step).unwrap();
            assert!(s.occupied.iter().all(|&p| before[p]));
            m.assign(&s);
            assert!(s.occupied.iter().all(|&p| m.satisfied()[p]));
        }
    }

    #[test]
    fn zero_temperature_limit_keeps_nothing() {
        // T = 0 gives p = 0: every spin is resampled freely
        let mut m = SwendsenWang::new(torus(3), 1, Constant(0.0), 2).unwrap();
        let s = m.proposal(1).unwrap();
        assert!(s.occupied.is_empty());
        assert_eq!(s.cocycle.len(), 9);
    }
}
