//! Independent chains run in parallel, one per seed.
//!
//! Each worker builds its own model from the shared configuration, so no
//! mutable state crosses threads; only the complex is shared (`Arc`).

use std::hash::Hasher;

use ahash::AHasher;
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::potts_error::PottsError;

/// Statistics of one chain.
#[derive(Clone, Debug, PartialEq)]
pub struct EnsembleRun {
    pub seed: u64,
    /// States emitted, initial state included.
    pub states: usize,
    /// `(name, series)` in registration order.
    pub statistics: Vec<(String, Vec<f64>)>,
}

impl EnsembleRun {
    pub fn statistic(&self, name: &str) -> Option<&[f64]> {
        self.statistics
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }
}

/// `count` well-mixed seeds derived from `global_seed`.
pub fn derive_seeds(global_seed: u64, count: usize) -> Vec<u64> {
    (0..count as u64)
        .map(|i| {
            let mut hasher = AHasher::default();
            hasher.write_u64(global_seed ^ i);
            hasher.finish()
        })
        .collect()
}

/// Run one chain per seed on a single shared complex; results follow `seeds`.
///
/// # Errors
/// The first construction error, or the first error any chain yields.
pub fn run_ensemble(config: &SimulationConfig, seeds: &[u64]) -> Result<Vec<EnsembleRun>, PottsError> {
    let complex = config.build_complex()?;
    log::debug!(
        "running {} {:?} chains of {} steps",
        seeds.len(),
        config.model,
        config.steps
    );
    seeds
        .par_iter()
        .map(|&seed| {
            let cfg = SimulationConfig {
                seed,
                ..config.clone()
            };
            let mut chain = cfg.build_chain_on(complex.clone())?;
            let states = chain.run()?;
            Ok(EnsembleRun {
                seed,
                states,
                statistics: chain
                    .statistics()
                    .into_iter()
                    .map(|(n, v)| (n.to_string(), v.to_vec()))
                    .collect(),
            })
        })
        .collect()
}
