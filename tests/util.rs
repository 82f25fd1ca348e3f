#![allow(dead_code)]
use std::sync::Arc;

use cubical_potts::topology::CubicalComplex;

/// Shared periodic complex, panicking on bad parameters.
pub fn torus(corners: &[usize], q: u32) -> Arc<CubicalComplex> {
    Arc::new(CubicalComplex::build(corners, q, None, true).expect("valid torus"))
}

/// Shared open complex.
pub fn open_box(corners: &[usize], q: u32) -> Arc<CubicalComplex> {
    Arc::new(CubicalComplex::build(corners, q, None, false).expect("valid box"))
}

pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Number of k-cells of a periodic lattice: `C(D, k) · ∏ (c_i + 1)`.
pub fn periodic_count(corners: &[usize], k: usize) -> usize {
    binomial(corners.len(), k) * corners.iter().map(|c| c + 1).product::<usize>()
}

/// Number of k-cells of an open lattice: sum over k-subsets of spanning axes.
pub fn open_count(corners: &[usize], k: usize) -> usize {
    let d = corners.len();
    (0u32..(1 << d))
        .filter(|mask| mask.count_ones() as usize == k)
        .map(|mask| {
            (0..d)
                .map(|i| {
                    if mask & (1 << i) != 0 {
                        corners[i]
                    } else {
                        corners[i] + 1
                    }
                })
                .product::<usize>()
        })
        .sum()
}

/// Mean of a series.
pub fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}
