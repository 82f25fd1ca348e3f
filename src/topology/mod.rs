//! Top-level module for lattice topology.
//!
//! This module builds the cubical complex a Potts chain runs on:
//! - [`periodic::LatticeShape`]: the box, its gluing and vertex numbering
//! - [`unit_cube`]: faces of the canonical unit hypercube
//! - [`cell`]: cells and their canonical keys
//! - [`skeleton::Tranches`]: per-dimension index ranges
//! - [`complex::CubicalComplex`]: the assembled complex
//! - [`boundary::BoundaryMatrix`]: signed boundary and coboundary operators
//!
//! Most users only need [`CubicalComplex::build`] and
//! [`CubicalComplex::boundary`].

pub mod boundary;
pub mod cell;
pub mod complex;
pub mod periodic;
pub mod skeleton;
pub mod unit_cube;

pub use boundary::{BoundaryMatrix, evaluate_cochain};
pub use cell::{Cell, CellKey};
pub use complex::{CubicalComplex, LatticeOptions};
pub use periodic::LatticeShape;
pub use skeleton::Tranches;
