//! The canonical unit hypercube `[0,1]^D` and its faces.
//!
//! Vertices of the unit cube are encoded as integers `0..2^D`: bit `i` is the
//! offset along axis `i` (binary encoding). A face is a pair of disjoint masks
//! `(base, span)`: its vertices are `base | s` for every submask `s` of `span`,
//! and its dimension is the number of spanning axes.

/// Bit mask over the axes of the lattice.
pub type AxisMask = u32;

/// A face of the unit cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeFace {
    pub base: AxisMask,
    pub span: AxisMask,
}

impl CubeFace {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.span.count_ones() as usize
    }

    /// Encoded unit-cube vertices of this face, in increasing order.
    pub fn vertices(&self) -> Vec<AxisMask> {
        let mut out = Vec::with_capacity(1 << self.dimension());
        // enumerate submasks of span
        let mut sub = self.span;
        loop {
            out.push(self.base | sub);
            if sub == 0 {
                break;
            }
            sub = (sub - 1) & self.span;
        }
        out.sort_unstable();
        out
    }

    /// The `2k` facets with their signed incidence.
    ///
    /// For the `j`-th spanning axis (in increasing axis order) the upper facet
    /// carries `(-1)^j` and the lower facet `-(-1)^j`.
    pub fn facets(&self) -> Vec<(CubeFace, i8)> {
        let mut out = Vec::with_capacity(2 * self.dimension());
        let mut j = 0;
        for axis in 0..AxisMask::BITS {
            let bit = 1 << axis;
            if self.span & bit == 0 {
                continue;
            }
            let sign: i8 = if j % 2 == 0 { 1 } else { -1 };
            let span = self.span & !bit;
            out.push((CubeFace { base: self.base, span }, -sign));
            out.push((CubeFace { base: self.base | bit, span }, sign));
            j += 1;
        }
        out
    }
}

/// The unit cube of a given dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitCube {
    dimension: usize,
}

impl UnitCube {
    pub fn new(dimension: usize) -> Self {
        debug_assert!(dimension < AxisMask::BITS as usize);
        Self { dimension }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All `C(D,k)·2^(D-k)` faces of dimension `k`, ordered by `(span, base)`.
    pub fn faces(&self, k: usize) -> Vec<CubeFace> {
        let full: AxisMask = (1 << self.dimension) - 1;
        let mut out = Vec::new();
        for span in 0..=full {
            if span.count_ones() as usize != k {
                continue;
            }
            for base in 0..=full {
                if base & span == 0 {
                    out.push(CubeFace { base, span });
                }
            }
        }
        out
    }
}

/// Encode per-axis 0/1 offsets as a vertex of the unit cube.
pub fn binary_encode(offsets: &[usize]) -> AxisMask {
    offsets
        .iter()
        .enumerate()
        .fold(0, |acc, (axis, &o)| acc | (((o & 1) as AxisMask) << axis))
}

/// Decode a unit-cube vertex into per-axis 0/1 offsets.
pub fn binary_decode(mask: AxisMask, dimension: usize) -> Vec<usize> {
    (0..dimension).map(|axis| ((mask >> axis) & 1) as usize).collect()
}
