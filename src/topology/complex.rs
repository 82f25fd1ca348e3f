//! Cubical complex of a (periodic) integer lattice.
//!
//! Construction proceeds dimension by dimension:
//! 1. the 0-skeleton is every grid point of the box, in lexicographic order;
//! 2. the k-cells come from the k-faces of one canonical unit hypercube,
//!    translated to every grid vertex, glued periodically and merged by
//!    [`CellKey`] lookup so shared faces enter the arena exactly once.
//!
//! Because dimensions are built in increasing order the arena is already
//! split into contiguous [`Tranches`], and every face of a k-cell is found in
//! the (k-1) tranche by key lookup.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::boundary::BoundaryMatrix;
use super::cell::{Cell, CellKey};
use super::periodic::LatticeShape;
use super::skeleton::Tranches;
use super::unit_cube::{CubeFace, UnitCube};
use crate::arithmetic::FiniteField;
use crate::debug_invariants::DebugInvariants;
use crate::potts_error::PottsError;

/// Parameters of a lattice complex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeOptions {
    /// Upper corner of the box along each axis.
    pub corners: Vec<usize>,
    /// Order of the coefficient field.
    pub field: u32,
    /// Highest cell dimension to build; defaults to the lattice dimension.
    pub max_dimension: Option<usize>,
    /// Glue opposite faces of the box (torus).
    pub periodic: bool,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            corners: vec![2, 2],
            field: 2,
            max_dimension: None,
            periodic: true,
        }
    }
}

/// Immutable cubical complex with per-dimension indexing.
#[derive(Clone, Debug)]
pub struct CubicalComplex {
    shape: LatticeShape,
    field: FiniteField,
    cells: Vec<Cell>,
    tranches: Tranches,
    index: HashMap<CellKey, usize>,
}

/// Key of `face` translated to `anchor`, or `None` if it leaves an open box.
fn translated_key(shape: &LatticeShape, anchor: &[usize], face: &CubeFace) -> Option<CellKey> {
    let mut ids = Vec::with_capacity(1 << face.dimension());
    let mut coords = vec![0; anchor.len()];
    for mask in face.vertices() {
        for (axis, c) in coords.iter_mut().enumerate() {
            *c = anchor[axis] + ((mask >> axis) & 1) as usize;
        }
        let glued = shape.glue(&coords)?;
        ids.push(shape.vertex_id(&glued));
    }
    Some(CellKey::new(ids, face.dimension()))
}

impl CubicalComplex {
    /// Build the complex of the box `∏[0, corners[i]]`.
    ///
    /// # Errors
    /// Construction errors for empty or non-positive corners, thin periodic
    /// axes, a field order that is not a prime power, or a `max_dimension`
    /// above `corners.len()`.
    pub fn build(
        corners: &[usize],
        field_order: u32,
        max_dimension: Option<usize>,
        periodic: bool,
    ) -> Result<Self, PottsError> {
        let shape = LatticeShape::new(corners, periodic)?;
        let field = FiniteField::new(field_order)?;
        let d = shape.dimension();
        let top = match max_dimension {
            Some(m) if m > d => {
                return Err(PottsError::DimensionTooLarge {
                    requested: m,
                    lattice: d,
                });
            }
            Some(m) => m,
            None => d,
        };

        let anchors: Vec<Vec<usize>> = shape.grid().collect();
        let mut cells = Vec::new();
        let mut index = HashMap::new();
        let mut counts = Vec::with_capacity(top + 1);

        for coords in &anchors {
            let key = CellKey::new(vec![shape.vertex_id(coords)], 0);
            index.insert(key.clone(), cells.len());
            cells.push(Cell::new(key, coords.clone(), 0, Vec::new(), Vec::new()));
        }
        counts.push(cells.len());

        let cube = UnitCube::new(d);
        for k in 1..=top {
            let before = cells.len();
            let faces = cube.faces(k);
            let mut merged = 0usize;
            for anchor in &anchors {
                'faces: for face in &faces {
                    let Some(key) = translated_key(&shape, anchor, face) else {
                        continue;
                    };
                    if index.contains_key(&key) {
                        merged += 1;
                        continue;
                    }
                    let mut face_ids = Vec::with_capacity(2 * k);
                    let mut signs = Vec::with_capacity(2 * k);
                    for (facet, sign) in face.facets() {
                        let found = translated_key(&shape, anchor, &facet)
                            .and_then(|fk| index.get(&fk).copied());
                        let Some(fid) = found else {
                            debug_assert!(false, "facet of an inside face must exist");
                            continue 'faces;
                        };
                        face_ids.push(fid);
                        signs.push(sign);
                    }
                    let corner: Vec<usize> = anchor
                        .iter()
                        .enumerate()
                        .map(|(axis, &c)| c + ((face.base >> axis) & 1) as usize)
                        .collect();
                    let Some(corner) = shape.glue(&corner) else {
                        continue;
                    };
                    index.insert(key.clone(), cells.len());
                    cells.push(Cell::new(key, corner, face.span, face_ids, signs));
                }
            }
            counts.push(cells.len() - before);
            log::debug!(
                "built {} {k}-cells ({merged} translates merged)",
                cells.len() - before
            );
        }

        let complex = Self {
            shape,
            field,
            cells,
            tranches: Tranches::from_counts(&counts),
            index,
        };
        complex.debug_assert_invariants();
        log::debug!(
            "cubical complex {:?} (periodic={}) over GF({}): counts {:?}",
            complex.shape.corners(),
            complex.shape.is_periodic(),
            complex.field.order(),
            counts
        );
        Ok(complex)
    }

    /// Build from [`LatticeOptions`].
    pub fn from_options(options: &LatticeOptions) -> Result<Self, PottsError> {
        Self::build(
            &options.corners,
            options.field,
            options.max_dimension,
            options.periodic,
        )
    }

    #[inline]
    pub fn shape(&self) -> &LatticeShape {
        &self.shape
    }

    #[inline]
    pub fn field(&self) -> &FiniteField {
        &self.field
    }

    /// Highest cell dimension present.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.tranches.top_dimension()
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn tranches(&self) -> &Tranches {
        &self.tranches
    }

    /// Number of cells of dimension `k`.
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.tranches.count(k)
    }

    /// Cell by global index.
    #[inline]
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// All cells, dimension 0 first.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cells of dimension `k`, in local index order.
    pub fn cells_of(&self, k: usize) -> &[Cell] {
        &self.cells[self.tranches.range(k)]
    }

    /// Global index of the cell with the given key.
    pub fn lookup(&self, key: &CellKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Grid coordinates of every vertex of a cell.
    pub fn vertex_coordinates(&self, index: usize) -> Vec<Vec<usize>> {
        self.cells[index]
            .vertices()
            .iter()
            .map(|&v| self.shape.coordinates(v))
            .collect()
    }

    /// Boundary operator from dimension `t` to `t - 1`.
    pub fn boundary(&self, t: usize) -> BoundaryMatrix {
        BoundaryMatrix::from_complex(self, t)
    }
}

impl DebugInvariants for CubicalComplex {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "CubicalComplex");
    }

    fn validate_invariants(&self) -> Result<(), PottsError> {
        self.tranches.validate_invariants()?;
        if self.tranches.len() != self.cells.len() {
            return Err(PottsError::DimensionMismatch {
                expected: self.tranches.len(),
                found: self.cells.len(),
            });
        }
        for (i, cell) in self.cells.iter().enumerate() {
            let k = cell.dimension();
            if self.tranches.dimension_of(i) != k {
                return Err(PottsError::DimensionMismatch {
                    expected: self.tranches.dimension_of(i),
                    found: k,
                });
            }
            crate::debug_invariants::check_faces(i, k, cell.faces(), |f| {
                self.tranches.dimension_of(f)
            })?;
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(CubicalComplex: Send, Sync);
