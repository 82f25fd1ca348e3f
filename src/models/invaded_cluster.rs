//! Plaquette invaded-cluster dynamics.
//!
//! Like [`HomologicalPercolation`](super::HomologicalPercolation), but the
//! plaquettes satisfied by the current cocycle invade first. An optional
//! stopping condition is checked at the top of every proposal; when it holds
//! the proposal reports [`PottsError::EarlyTermination`], which a chain treats
//! as a normal end.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::percolation::state_from_outcome;
use super::{Model, Spins, State};
use crate::arithmetic::FieldElement;
use crate::homology::{Filtration, PersistenceTracker};
use crate::potts_error::PottsError;
use crate::topology::{BoundaryMatrix, CubicalComplex};

type StoppingCondition = Box<dyn Fn(&InvadedCluster) -> bool + Send + Sync>;

pub struct InvadedCluster {
    spins: Spins,
    tracker: PersistenceTracker,
    stopping_condition: Option<StoppingCondition>,
    proposals: usize,
    rng: SmallRng,
}

impl InvadedCluster {
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
            stopping_condition: None,
            proposals: 0,
            rng,
        })
    }

    pub fn with_initial(mut self, cocycle: Vec<FieldElement>) -> Result<Self, PottsError> {
        self.spins.set_initial(cocycle)?;
        Ok(self)
    }

    pub fn with_essential_required(mut self, n: usize) -> Self {
        self.tracker = self.tracker.with_essential_required(n);
        self
    }

    /// Stop the chain as soon as `condition` holds before a proposal.
    pub fn with_stopping_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&InvadedCluster) -> bool + Send + Sync + 'static,
    {
        self.stopping_condition = Some(Box::new(condition));
        self
    }

    /// Proposals made so far.
    pub fn proposals(&self) -> usize {
        self.proposals
    }

    pub fn tracker(&self) -> &PersistenceTracker {
        &self.tracker
    }
}

impl Model for InvadedCluster {
    fn name(&self) -> &'static str {
        "invaded-cluster"
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
        if let Some(stop) = &self.stopping_condition {
            if stop(self) {
                log::debug!("stopping condition met before step {step}");
                return Err(PottsError::EarlyTermination { step });
            }
        }
        self.proposals += 1;
        let outcome = self.tracker.essential_cycles_born(
            Filtration::SatisfiedFirst,
            &self.spins.state.cocycle,
            &mut self.rng,
        )?;
        let candidates = outcome.satisfied.iter().filter(|&&s| s).count();
        log::trace!(
            "step {step}: {candidates} satisfied plaquettes, essential birth at {:?}",
            outcome.birth
        );
        Ok(state_from_outcome(outcome, candidates))
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

impl std::fmt::Debug for InvadedCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvadedCluster")
            .field("homology", &self.spins.homology)
            .field("proposals", &self.proposals)
            .field("stopping", &self.stopping_condition.is_some())
            .field("state", &self.spins.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus() -> Arc<CubicalComplex> {
        Arc::new(CubicalComplex::build(&[3, 3], 3, None, true).unwrap())
    }

    #[test]
    fn stopping_condition_ends_with_early_termination() {
        let mut m = InvadedCluster::new(torus(), 1, 3)
            .unwrap()
            .with_stopping_condition(|ic| ic.proposals() >= 2);
        assert!(m.proposal(1).is_ok());
        assert!(m.proposal(2).is_ok());
        let err = m.proposal(3).unwrap_err();
        assert_eq!(err, PottsError::EarlyTermination { step: 3 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn satisfied_plaquettes_invade_first() {
        let mut m = InvadedCluster::new(torus(), 1, 12).unwrap();
        for step in 1..=10 {
            let s = m.proposal(step).unwrap();
            let rec = s.percolation.as_ref().unwrap();
            let first_unsatisfied = s.occupied.iter().position(|&p| !rec.satisfied[p]);
            if let Some(k) = first_unsatisfied {
                // every satisfied plaquette precedes the first unsatisfied one
                assert_eq!(k, s.candidates);
                assert!(s.occupied[k..].iter().all(|&p| !rec.satisfied[p]));
            }
            m.assign(&s);
        }
    }
}
