#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cubical-potts
//!
//! cubical-potts runs generalized Potts-model Markov chains on d-dimensional
//! periodic cubical lattices and detects homological percolation: the
//! insertion time at which a lattice-spanning homology class is born, found
//! by persistence reduction over a finite field rather than graph
//! connectivity.
//!
//! ## Features
//! - Periodic and open cubical complexes with stable per-dimension indexing
//! - Signed boundary and coboundary operators over GF(q) for any prime power q
//! - Uniform sampling of cocycles from restricted coboundary kernels
//! - Swendsen-Wang, homological percolation, invaded-cluster and Glauber rules
//! - A lazy chain driver with pluggable acceptance rules, temperature
//!   schedules and statistics
//! - Parallel ensembles of independent chains behind the `rayon` feature
//!
//! ## Determinism
//!
//! Models and the Metropolis rule each own a `SmallRng` seeded from the run's
//! seed, and randomized schedules derive every draw from `(seed, step)`, so a
//! chain replays exactly from its configuration. Filtration keys tie-break on
//! cell index, and the ensemble derives per-chain seeds by hashing the global
//! seed.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use cubical_potts::prelude::*;
//!
//! let complex = Arc::new(CubicalComplex::build(&[2, 2], 2, None, true).unwrap());
//! let model = SwendsenWang::new(complex, 1, Constant(-(3f64).ln()), 7).unwrap();
//! let mut chain = Chain::new(model, 10)
//!     .with_statistic("inclusion", cubical_potts::chain::statistics::inclusion_fraction());
//! assert_eq!(chain.run().unwrap(), 11);
//! ```
//!
//! ## Logging
//! The crate logs through the `log` facade only: `debug` for construction
//! summaries, `trace` for per-step detail. Install any logger to see it.

pub mod arithmetic;
pub mod chain;
pub mod config;
pub mod debug_invariants;
#[cfg(feature = "rayon")]
pub mod ensemble;
pub mod homology;
pub mod models;
pub mod potts_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use potts_error::{ErrorKind, PottsError};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::arithmetic::{
        DenseMatrix, FieldElement, FiniteField, sample_from_kernel, sample_nonzero_from_kernel,
    };
    pub use crate::chain::{
        AcceptWith, Acceptance, Always, Chain, ChainStatus, Constant, Critical, Linear,
        Metropolis, RandomizedToConstant, TemperatureSchedule,
    };
    pub use crate::config::{AcceptanceKind, ModelKind, SimulationConfig};
    pub use crate::debug_invariants::DebugInvariants;
    #[cfg(feature = "rayon")]
    pub use crate::ensemble::run_ensemble;
    pub use crate::homology::{Filtration, PercolationOutcome, PersistenceTracker};
    pub use crate::models::{
        AnyModel, Glauber, HomologicalPercolation, InvadedCluster, Model, State, SwendsenWang,
    };
    pub use crate::potts_error::{ErrorKind, PottsError};
    pub use crate::topology::{BoundaryMatrix, CubicalComplex, LatticeOptions, evaluate_cochain};
}
