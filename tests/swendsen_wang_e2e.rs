mod util;

use cubical_potts::chain::statistics;
use cubical_potts::prelude::*;
use util::{mean, torus};

/// Pooled inclusion rate of a 1000-step run at `T = -ln 3`, checking that
/// every emitted cocycle vanishes on its included plaquettes.
fn inclusion_rate(homology: usize, seed: u64) -> f64 {
    let complex = torus(&[2, 2], 2);
    let model = SwendsenWang::new(complex.clone(), homology, Constant(-(3f64).ln()), seed).unwrap();
    let boundary = complex.boundary(homology);
    let chain = Chain::new(model, 1_000);

    let mut occupied = 0usize;
    let mut candidates = 0usize;
    for (step, state) in chain.enumerate() {
        let state = state.unwrap();
        let values = boundary.evaluate(complex.field(), &state.cocycle).unwrap();
        assert!(state.occupied.iter().all(|&p| values[p] == 0), "step {step}");
        occupied += state.occupied.len();
        candidates += state.candidates;
    }
    occupied as f64 / candidates as f64
}

#[test]
fn inclusion_rate_of_top_cells_is_two_thirds() {
    // h = 2 on the 3x3 torus: spins on edges, plaquettes are the squares
    let rate = inclusion_rate(2, 2024);
    assert!((rate - 2.0 / 3.0).abs() < 0.05, "rate {rate}");
}

#[test]
fn inclusion_rate_of_edges_is_two_thirds() {
    // h = 1: spins on vertices, plaquettes are the edges
    let rate = inclusion_rate(1, 2024);
    assert!((rate - 2.0 / 3.0).abs() < 0.05, "rate {rate}");
}

#[test]
fn ordered_phase_at_low_temperature() {
    let complex = torus(&[3, 3], 3);
    let model = SwendsenWang::new(complex, 1, Constant(-3.0), 5).unwrap();
    let mut chain = Chain::new(model, 200)
        .with_statistic("satisfied", statistics::satisfied_fraction());
    chain.run().unwrap();
    let satisfied = chain.statistic("satisfied").unwrap();
    assert!(mean(&satisfied[100..]) > 0.8);
}

#[test]
fn temperature_zero_is_a_domain_boundary() {
    let complex = torus(&[2, 2], 2);
    let model = SwendsenWang::new(complex, 1, Constant(0.0), 1).unwrap();
    // p = 0 is allowed: nothing joins, spins are resampled freely
    assert_eq!(model.inclusion_probability(1).unwrap(), 0.0);
    let mut chain = Chain::new(model, 3);
    assert_eq!(chain.run().unwrap(), 4);
}
