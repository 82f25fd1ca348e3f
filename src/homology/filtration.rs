//! Randomized insertion orders ("filtrations") over the cells of a complex.
//!
//! Cells below dimension `h - 1` are always present and enter first, in index
//! order. The `(h-1)`-, `h`- and `(h+1)`-cells follow in three blocks, each
//! ordered by independent uniform keys with ties broken by cell index. The
//! plaquette block may instead put satisfied plaquettes ahead of unsatisfied
//! ones.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::topology::CubicalComplex;

/// How plaquettes (cells of the homology dimension) are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filtration {
    /// Every plaquette by a uniform random key.
    #[default]
    Uniform,
    /// Plaquettes satisfied by the current cocycle first, each group shuffled.
    SatisfiedFirst,
}

/// Global cell indices in insertion order, plus the inverse map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionOrder {
    cells: Vec<usize>,
    /// `position[global]` for inserted cells; `usize::MAX` otherwise.
    position: Vec<usize>,
}

impl InsertionOrder {
    /// Draw an insertion order for homology dimension `h`.
    ///
    /// `satisfied` is indexed by local plaquette index and only read under
    /// [`Filtration::SatisfiedFirst`].
    pub fn draw<R: Rng + ?Sized>(
        complex: &CubicalComplex,
        h: usize,
        strategy: Filtration,
        satisfied: &[bool],
        rng: &mut R,
    ) -> Self {
        let tranches = complex.tranches();
        let mut cells: Vec<usize> = (0..h.saturating_sub(1))
            .flat_map(|k| tranches.range(k))
            .collect();

        if h >= 1 {
            cells.extend(shuffled(tranches.range(h - 1), |_| false, rng));
        }
        let plaquettes = tranches.range(h);
        let start = plaquettes.start;
        match strategy {
            Filtration::Uniform => cells.extend(shuffled(plaquettes, |_| false, rng)),
            Filtration::SatisfiedFirst => cells.extend(shuffled(
                plaquettes,
                |g| !satisfied.get(g - start).copied().unwrap_or(false),
                rng,
            )),
        }
        cells.extend(shuffled(tranches.range(h + 1), |_| false, rng));

        let mut position = vec![usize::MAX; complex.len()];
        for (i, &c) in cells.iter().enumerate() {
            position[c] = i;
        }
        Self { cells, position }
    }

    /// Inserted cells, first to last.
    #[inline]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Filtration position of a global cell index, if inserted.
    #[inline]
    pub fn position(&self, cell: usize) -> Option<usize> {
        match self.position[cell] {
            usize::MAX => None,
            p => Some(p),
        }
    }
}

/// Sort `range` by `(group, key, index)` with one uniform key per cell.
fn shuffled<R: Rng + ?Sized>(
    range: std::ops::Range<usize>,
    group: impl Fn(usize) -> bool,
    rng: &mut R,
) -> Vec<usize> {
    let mut keyed: Vec<(bool, f64, usize)> = range
        .map(|c| (group(c), rng.r#gen::<f64>(), c))
        .collect();
    keyed.sort_unstable_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .then(a.2.cmp(&b.2))
    });
    keyed.into_iter().map(|(_, _, c)| c).collect()
}
