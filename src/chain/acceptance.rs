//! Acceptance rules deciding between the committed and the proposed state.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::schedules::{BoxedSchedule, TemperatureSchedule};
use crate::models::{Model, State};
use crate::potts_error::PottsError;

pub trait Acceptance<M: Model> {
    /// Whether `proposed` replaces `model.state()` at `step`.
    fn accept(&mut self, model: &M, proposed: &State, step: usize) -> Result<bool, PottsError>;
}

/// Accept every proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Always;

impl<M: Model> Acceptance<M> for Always {
    fn accept(&mut self, _model: &M, _proposed: &State, _step: usize) -> Result<bool, PottsError> {
        Ok(true)
    }
}

/// Metropolis rule: accept with probability `min(1, exp(-β ΔE))`,
/// `β = -temperature(step)`.
pub struct Metropolis {
    schedule: BoxedSchedule,
    rng: SmallRng,
}

impl Metropolis {
    pub fn new(schedule: impl TemperatureSchedule + Send + Sync + 'static, seed: u64) -> Self {
        Self::with_schedule(Box::new(schedule), seed)
    }

    pub fn with_schedule(schedule: BoxedSchedule, seed: u64) -> Self {
        Self {
            schedule,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<M: Model> Acceptance<M> for Metropolis {
    fn accept(&mut self, model: &M, proposed: &State, step: usize) -> Result<bool, PottsError> {
        let delta = model.energy_of(&proposed.cocycle)? - model.energy();
        if delta <= 0.0 {
            return Ok(true);
        }
        let beta = -self.schedule.temperature(step);
        let ratio = (-beta * delta).exp();
        log::trace!("step {step}: ΔE = {delta}, β = {beta:.4}, ratio {ratio:.4}");
        Ok(self.rng.r#gen::<f64>() < ratio)
    }
}

impl std::fmt::Debug for Metropolis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metropolis").finish_non_exhaustive()
    }
}

/// Any `(current, proposed, step) -> bool` closure.
pub struct AcceptWith<F>(pub F);

impl<M, F> Acceptance<M> for AcceptWith<F>
where
    M: Model,
    F: FnMut(&State, &State, usize) -> bool,
{
    fn accept(&mut self, model: &M, proposed: &State, step: usize) -> Result<bool, PottsError> {
        Ok((self.0)(model.state(), proposed, step))
    }
}

/// Runtime choice between [`Always`] and [`Metropolis`].
#[derive(Debug)]
pub enum AnyAcceptance {
    Always(Always),
    Metropolis(Metropolis),
}

impl<M: Model> Acceptance<M> for AnyAcceptance {
    fn accept(&mut self, model: &M, proposed: &State, step: usize) -> Result<bool, PottsError> {
        match self {
            AnyAcceptance::Always(a) => a.accept(model, proposed, step),
            AnyAcceptance::Metropolis(m) => m.accept(model, proposed, step),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chain::schedules::Constant;
    use crate::models::Glauber;
    use crate::topology::CubicalComplex;

    fn model() -> Glauber {
        let c = Arc::new(CubicalComplex::build(&[2, 2], 2, None, true).unwrap());
        let mut m = Glauber::new(c, 1, 0).unwrap();
        m.assign(&State::from_cocycle(vec![0; 9]));
        m
    }

    #[test]
    fn downhill_moves_are_always_accepted() {
        let m = model();
        let mut rule = Metropolis::new(Constant(-50.0), 1);
        // same energy as the ground state
        assert!(rule.accept(&m, &State::from_cocycle(vec![1; 9]), 1).unwrap());
    }

    #[test]
    fn cold_chains_reject_uphill_moves() {
        let m = model();
        let mut spins = vec![0; 9];
        spins[0] = 1;
        let uphill = State::from_cocycle(spins);
        let mut cold = Metropolis::new(Constant(-50.0), 1);
        assert!((0..100).all(|s| !cold.accept(&m, &uphill, s).unwrap()));
        // β = 0 accepts everything
        let mut hot = Metropolis::new(|_: usize| 0.0, 1);
        assert!((0..100).all(|s| hot.accept(&m, &uphill, s).unwrap()));
    }

    #[test]
    fn closures_see_current_and_proposed() {
        let m = model();
        let mut rule = AcceptWith(|cur: &State, prop: &State, step: usize| {
            step % 2 == 0 && cur.cocycle != prop.cocycle
        });
        let p = State::from_cocycle(vec![1; 9]);
        assert!(rule.accept(&m, &p, 2).unwrap());
        assert!(!rule.accept(&m, &p, 3).unwrap());
        assert!(Always.accept(&m, &p, 3).unwrap());
    }
}
