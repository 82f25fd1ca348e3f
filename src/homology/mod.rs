//! Persistent homology of randomized cell insertions.
//!
//! - [`filtration`]: insertion orders over the cells of a complex
//! - [`persistence`]: column reduction and essential-cycle detection

pub mod filtration;
pub mod persistence;

pub use filtration::{Filtration, InsertionOrder};
pub use persistence::{
    PercolationOutcome, PersistencePair, PersistencePairs, PersistenceTracker,
};
