//! Per-step statistics and post-processing helpers.
//!
//! A statistic is any `FnMut(&M, &State) -> f64`; the chain evaluates it after
//! every `assign`. Constructors below cover the observables used for Potts
//! and percolation runs.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::{Model, State};

/// Boxed statistic as stored by a [`Chain`](super::Chain).
pub type StatisticFn<M> = Box<dyn FnMut(&M, &State) -> f64 + Send>;

/// Hamiltonian of the committed cocycle.
pub fn energy<M: Model + 'static>() -> StatisticFn<M> {
    Box::new(|model: &M, _state: &State| model.energy())
}

/// Fraction of plaquettes satisfied by the committed cocycle.
pub fn satisfied_fraction<M: Model + 'static>() -> StatisticFn<M> {
    Box::new(|model: &M, _state: &State| {
        let satisfied = model.satisfied();
        if satisfied.is_empty() {
            return 0.0;
        }
        satisfied.iter().filter(|&&s| s).count() as f64 / satisfied.len() as f64
    })
}

/// Fraction of all plaquettes occupied by the move.
pub fn occupied_fraction<M: Model + 'static>() -> StatisticFn<M> {
    Box::new(|model: &M, state: &State| {
        let total = model.complex().count(model.homology());
        if total == 0 {
            return 0.0;
        }
        state.occupied.len() as f64 / total as f64
    })
}

/// Occupied plaquettes over candidate plaquettes; `0` when there were none.
pub fn inclusion_fraction<M: Model + 'static>() -> StatisticFn<M> {
    Box::new(|_model: &M, state: &State| {
        if state.candidates == 0 {
            0.0
        } else {
            state.occupied.len() as f64 / state.candidates as f64
        }
    })
}

/// Number of essential plaquette classes; `0` for non-percolation states.
pub fn essential_count<M: Model + 'static>() -> StatisticFn<M> {
    Box::new(|_model: &M, state: &State| {
        state
            .percolation
            .as_ref()
            .map_or(0.0, |p| p.essential_count() as f64)
    })
}

/// Filtration position of the percolation event; `NaN` when none occurred.
pub fn birth_time<M: Model + 'static>() -> StatisticFn<M> {
    Box::new(|_model: &M, state: &State| {
        state
            .percolation
            .as_ref()
            .and_then(|p| p.birth)
            .map_or(f64::NAN, |b| b as f64)
    })
}

/// Cocycle evaluated on the boundary of a uniformly chosen unoccupied
/// plaquette; `0` when every plaquette is occupied.
pub fn wilson_loop<M: Model + 'static>(seed: u64) -> StatisticFn<M> {
    let mut rng = SmallRng::seed_from_u64(seed);
    Box::new(move |model: &M, state: &State| {
        let total = model.complex().count(model.homology());
        let mut occupied = vec![false; total];
        for &p in &state.occupied {
            occupied[p] = true;
        }
        let free: Vec<usize> = (0..total).filter(|&p| !occupied[p]).collect();
        if free.is_empty() {
            return 0.0;
        }
        let plaquette = free[rng.gen_range(0..free.len())];
        let field = model.field();
        let value = model
            .boundary()
            .column(plaquette)
            .iter()
            .fold(0, |acc, &(r, c)| field.mul_add(acc, c, state.cocycle[r]));
        value as f64
    })
}

/// Normalized autocorrelation of `series` for lags `0..len - lag`.
///
/// Empty when `series` is not longer than `lag`; all zeros for a constant
/// series.
pub fn autocorrelation(series: &[f64], lag: usize) -> Vec<f64> {
    let n = series.len();
    if n <= lag {
        return Vec::new();
    }
    let mean = series.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = series.iter().map(|x| x - mean).collect();
    let raw: Vec<f64> = (0..n - lag)
        .map(|t| {
            centered[..n - t]
                .iter()
                .zip(&centered[t..])
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n as f64
        })
        .collect();
    let variance = raw[0];
    if variance == 0.0 {
        return vec![0.0; raw.len()];
    }
    raw.into_iter().map(|r| r / variance).collect()
}
