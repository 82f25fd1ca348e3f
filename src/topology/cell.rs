//! Cubical cells stored in an arena and addressed by integer index.
//!
//! A [`Cell`] knows its dimension, its canonical [`CellKey`] (sorted vertex
//! ids plus dimension) and the indices of its faces together with the signed
//! incidence of each. Nothing is shared or mutated after construction.

use std::fmt;

use super::unit_cube::AxisMask;

/// Canonical identity of a cell within a complex.
///
/// Two translates of the same unit-cube face that land on the same glued
/// vertices produce equal keys; this is what deduplication keys on.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    vertices: Box<[usize]>,
    dimension: usize,
}

impl CellKey {
    /// Build a key; `vertices` need not be sorted.
    pub fn new(mut vertices: Vec<usize>, dimension: usize) -> Self {
        vertices.sort_unstable();
        Self {
            vertices: vertices.into_boxed_slice(),
            dimension,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl fmt::Debug for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // (v0, v1, ..., dim), the tuple layout of the encoding
        let mut t = f.debug_tuple("");
        for v in self.vertices.iter() {
            t.field(v);
        }
        t.field(&self.dimension).finish()
    }
}

/// A k-dimensional cube of the lattice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    key: CellKey,
    /// Glued coordinates of the corner the cell grows from.
    anchor: Vec<usize>,
    /// Axes the cell extends along.
    span: AxisMask,
    /// Global indices of the (k-1)-faces, paired with `signs`.
    faces: Vec<usize>,
    signs: Vec<i8>,
}

impl Cell {
    pub(crate) fn new(
        key: CellKey,
        anchor: Vec<usize>,
        span: AxisMask,
        faces: Vec<usize>,
        signs: Vec<i8>,
    ) -> Self {
        debug_assert_eq!(faces.len(), signs.len());
        debug_assert_eq!(faces.len(), 2 * key.dimension());
        Self {
            key,
            anchor,
            span,
            faces,
            signs,
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.key.dimension()
    }

    #[inline]
    pub fn key(&self) -> &CellKey {
        &self.key
    }

    /// Sorted vertex ids of the cell.
    #[inline]
    pub fn vertices(&self) -> &[usize] {
        self.key.vertices()
    }

    #[inline]
    pub fn anchor(&self) -> &[usize] {
        &self.anchor
    }

    #[inline]
    pub fn span(&self) -> AxisMask {
        self.span
    }

    /// Axes the cell extends along, in increasing order.
    pub fn axes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..AxisMask::BITS as usize).filter(move |&a| self.span & (1 << a) != 0)
    }

    /// Global face indices.
    #[inline]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// `(face, ±1)` pairs.
    pub fn signed_faces(&self) -> impl Iterator<Item = (usize, i8)> + '_ {
        self.faces.iter().copied().zip(self.signs.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_ignore_vertex_order() {
        let a = CellKey::new(vec![4, 1, 3, 0], 2);
        let b = CellKey::new(vec![0, 1, 3, 4], 2);
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), "(0, 1, 3, 4, 2)");
    }

    #[test]
    fn keys_distinguish_dimension() {
        assert_ne!(CellKey::new(vec![0], 0), CellKey::new(vec![0], 1));
    }
}
