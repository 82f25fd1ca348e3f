//! Generic Markov-chain driver.
//!
//! A [`Chain`] is a finite lazy sequence of states:
//! 1. the first call emits the model's initial state (step 0);
//! 2. every later call proposes, applies the acceptance rule, commits the
//!    winner with [`Model::assign`] and evaluates the registered statistics;
//! 3. the chain ends after `max_steps` proposals, when the model reports
//!    [`PottsError::EarlyTermination`], or after yielding any other error once.

use crate::models::{Model, State};
use crate::potts_error::PottsError;

pub mod acceptance;
pub mod schedules;
pub mod statistics;

pub use acceptance::{AcceptWith, Acceptance, Always, AnyAcceptance, Metropolis};
pub use schedules::{
    BoxedSchedule, Constant, Critical, Linear, RandomizedToConstant, ScheduleConfig,
    TemperatureSchedule,
};
pub use statistics::StatisticFn;

/// Lifecycle of a [`Chain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainStatus {
    NotStarted,
    Running,
    Finished,
}

struct Series<M> {
    name: String,
    function: StatisticFn<M>,
    values: Vec<f64>,
}

pub struct Chain<M: Model, A: Acceptance<M> = Always> {
    model: M,
    acceptance: A,
    max_steps: usize,
    step: usize,
    status: ChainStatus,
    statistics: Vec<Series<M>>,
}

impl<M: Model + 'static> Chain<M, Always> {
    /// Chain accepting every proposal, recording `energy`.
    pub fn new(model: M, max_steps: usize) -> Self {
        Self {
            model,
            acceptance: Always,
            max_steps,
            step: 0,
            status: ChainStatus::NotStarted,
            statistics: vec![Series {
                name: "energy".to_string(),
                function: statistics::energy(),
                values: Vec::new(),
            }],
        }
    }
}

impl<M: Model, A: Acceptance<M>> Chain<M, A> {
    /// Replace the acceptance rule.
    pub fn with_acceptance<B: Acceptance<M>>(self, acceptance: B) -> Chain<M, B> {
        Chain {
            model: self.model,
            acceptance,
            max_steps: self.max_steps,
            step: self.step,
            status: self.status,
            statistics: self.statistics,
        }
    }

    /// Register a statistic; series keep registration order. A name already
    /// registered is replaced.
    pub fn with_statistic(mut self, name: impl Into<String>, function: StatisticFn<M>) -> Self {
        let name = name.into();
        if let Some(existing) = self.statistics.iter_mut().find(|s| s.name == name) {
            log::warn!("statistic {name:?} registered twice; keeping the later one");
            existing.function = function;
            return self;
        }
        self.statistics.push(Series {
            name,
            function,
            values: Vec::new(),
        });
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Index of the last emitted state.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn status(&self) -> ChainStatus {
        self.status
    }

    /// Collected series, in registration order.
    pub fn statistics(&self) -> Vec<(&str, &[f64])> {
        self.statistics
            .iter()
            .map(|s| (s.name.as_str(), s.values.as_slice()))
            .collect()
    }

    /// One series by name.
    pub fn statistic(&self, name: &str) -> Option<&[f64]> {
        self.statistics
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.values.as_slice())
    }

    /// Drain the chain; returns the number of states emitted.
    ///
    /// # Errors
    /// The first error the chain yields.
    pub fn run(&mut self) -> Result<usize, PottsError> {
        let mut emitted = 0;
        for state in self.by_ref() {
            state?;
            emitted += 1;
        }
        Ok(emitted)
    }

    fn record(&mut self, state: &State) {
        for series in &mut self.statistics {
            let value = (series.function)(&self.model, state);
            series.values.push(value);
        }
    }

    fn advance(&mut self) -> Result<State, PottsError> {
        let step = self.step + 1;
        let proposed = self.model.proposal(step)?;
        let accepted = if self.acceptance.accept(&self.model, &proposed, step)? {
            proposed
        } else {
            let mut kept = self.model.state().clone();
            kept.occupied.clear();
            kept.candidates = 0;
            kept
        };
        let expected = self.model.boundary().nrows();
        if accepted.cocycle.len() != expected {
            return Err(PottsError::DimensionMismatch {
                expected,
                found: accepted.cocycle.len(),
            });
        }
        self.model.assign(&accepted);
        self.record(&accepted);
        self.step = step;
        Ok(accepted)
    }
}

impl<M: Model, A: Acceptance<M>> Iterator for Chain<M, A> {
    type Item = Result<State, PottsError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.status {
            ChainStatus::Finished => None,
            ChainStatus::NotStarted => {
                let initial = self.model.initial();
                self.model.assign(&initial);
                self.record(&initial);
                self.status = ChainStatus::Running;
                log::debug!(
                    "{} chain started for {} steps",
                    self.model.name(),
                    self.max_steps
                );
                Some(Ok(initial))
            }
            ChainStatus::Running if self.step >= self.max_steps => {
                self.status = ChainStatus::Finished;
                None
            }
            ChainStatus::Running => match self.advance() {
                Ok(state) => Some(Ok(state)),
                Err(PottsError::EarlyTermination { step }) => {
                    log::debug!("{} chain terminated early at step {step}", self.model.name());
                    self.status = ChainStatus::Finished;
                    None
                }
                Err(e) => {
                    log::warn!("{} chain failed at step {}: {e}", self.model.name(), self.step + 1);
                    self.status = ChainStatus::Finished;
                    Some(Err(e))
                }
            },
        }
    }
}

impl<M: Model, A: Acceptance<M>> std::fmt::Debug for Chain<M, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("model", &self.model.name())
            .field("step", &self.step)
            .field("max_steps", &self.max_steps)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
