//! Lattice shape and periodic gluing.
//!
//! A [`LatticeShape`] describes the box `∏[0, corners[i]]` of integer grid
//! points, so axis `i` carries `corners[i] + 1` vertices. With periodic
//! boundary conditions coordinates are taken modulo `corners[i] + 1`: the
//! unit step past the far corner lands on `0` and the box becomes a torus.
//! Open boxes drop any point past the far corner instead.
//!
//! Vertex ids are mixed-radix linear indices with axis 0 most significant,
//! which matches the lexicographic enumeration order of [`LatticeShape::grid`].

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::potts_error::PottsError;

/// Box of grid points with optional periodic gluing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeShape {
    corners: Vec<usize>,
    periodic: bool,
}

impl LatticeShape {
    /// Validate corners and build the shape.
    ///
    /// # Errors
    /// - [`PottsError::EmptyCorners`] for an empty corner list;
    /// - [`PottsError::InvalidCorner`] for a corner below 1;
    /// - [`PottsError::DegeneratePeriodicAxis`] for a periodic corner of 1:
    ///   a two-vertex cycle has two edges on the same vertex set.
    pub fn new(corners: &[usize], periodic: bool) -> Result<Self, PottsError> {
        if corners.is_empty() {
            return Err(PottsError::EmptyCorners);
        }
        for (axis, &value) in corners.iter().enumerate() {
            if value < 1 {
                return Err(PottsError::InvalidCorner { axis, value });
            }
            if periodic && value < 2 {
                return Err(PottsError::DegeneratePeriodicAxis { axis, value });
            }
        }
        Ok(Self {
            corners: corners.to_vec(),
            periodic,
        })
    }

    #[inline]
    pub fn corners(&self) -> &[usize] {
        &self.corners
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Number of axes.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.corners.len()
    }

    /// Distinct vertex coordinates along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.corners[axis] + 1
    }

    /// Total number of vertices.
    pub fn vertex_count(&self) -> usize {
        (0..self.dimension()).map(|a| self.extent(a)).product()
    }

    /// Glue a coordinate that may sit one step past the box back onto it.
    ///
    /// Returns `None` when the point lies outside an open box.
    pub fn glue(&self, coords: &[usize]) -> Option<Vec<usize>> {
        coords
            .iter()
            .enumerate()
            .map(|(axis, &c)| {
                if self.periodic {
                    Some(c % (self.corners[axis] + 1))
                } else if c <= self.corners[axis] {
                    Some(c)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Linear id of a glued coordinate.
    pub fn vertex_id(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .enumerate()
            .fold(0, |acc, (axis, &c)| acc * self.extent(axis) + c)
    }

    /// Inverse of [`vertex_id`](Self::vertex_id).
    pub fn coordinates(&self, mut id: usize) -> Vec<usize> {
        let mut out = vec![0; self.dimension()];
        for axis in (0..self.dimension()).rev() {
            let n = self.extent(axis);
            out[axis] = id % n;
            id /= n;
        }
        out
    }

    /// Every vertex coordinate in lexicographic (vertex id) order.
    pub fn grid(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        (0..self.dimension())
            .map(|axis| 0..self.extent(axis))
            .multi_cartesian_product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_axes_glue_the_far_corner() {
        let s = LatticeShape::new(&[2, 3], true).unwrap();
        assert_eq!(s.vertex_count(), 12);
        assert_eq!(s.glue(&[2, 3]), Some(vec![2, 3]));
        assert_eq!(s.glue(&[3, 4]), Some(vec![0, 0]));
        assert_eq!(s.glue(&[1, 4]), Some(vec![1, 0]));
    }

    #[test]
    fn open_boxes_drop_points_outside() {
        let s = LatticeShape::new(&[2, 2], false).unwrap();
        assert_eq!(s.vertex_count(), 9);
        assert_eq!(s.glue(&[2, 2]), Some(vec![2, 2]));
        assert_eq!(s.glue(&[3, 0]), None);
    }

    #[test]
    fn vertex_ids_follow_grid_order() {
        let s = LatticeShape::new(&[2, 2, 2], true).unwrap();
        for (i, c) in s.grid().enumerate() {
            assert_eq!(s.vertex_id(&c), i);
            assert_eq!(s.coordinates(i), c);
        }
    }

    #[test]
    fn thin_tori_are_rejected() {
        assert_eq!(
            LatticeShape::new(&[2, 1], true),
            Err(PottsError::DegeneratePeriodicAxis { axis: 1, value: 1 })
        );
        assert!(LatticeShape::new(&[2, 1], false).is_ok());
        // three vertices per axis is the thinnest torus
        assert_eq!(LatticeShape::new(&[2, 2], true).unwrap().vertex_count(), 9);
        assert_eq!(LatticeShape::new(&[], false), Err(PottsError::EmptyCorners));
        assert_eq!(
            LatticeShape::new(&[1, 0], false),
            Err(PottsError::InvalidCorner { axis: 1, value: 0 })
        );
    }
}
