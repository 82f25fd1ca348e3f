//! PottsError: Unified error type for cubical-potts public APIs
//!
//! Every fallible operation in the crate returns this error. Construction
//! failures are fatal before a chain runs; `EarlyTermination` is the only
//! variant a [`Chain`](crate::chain::Chain) recovers from on its own.

use thiserror::Error;

/// Coarse classification of a [`PottsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid lattice or field parameters.
    Construction,
    /// A computed inclusion probability left `[0, 1]`.
    NumericalDomain,
    /// Model-signaled end of iteration; not a failure.
    EarlyTermination,
    /// Trivial kernel where a nonzero cocycle was required.
    DegenerateKernel,
    /// Caller passed data of the wrong shape.
    Usage,
}

/// Unified error type for cubical-potts operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PottsError {
    /// The corner list was empty.
    #[error("Construction error: lattice needs at least one corner")]
    EmptyCorners,
    /// A corner was smaller than one.
    #[error("Construction error: corner {value} on axis {axis} must be at least 1")]
    InvalidCorner { axis: usize, value: usize },
    /// The requested field order is not a supported prime power.
    #[error("Construction error: field order {0} is not a prime power in 2..=65536")]
    InvalidFieldOrder(u32),
    /// The requested maximal cell dimension exceeds the lattice dimension.
    #[error("Construction error: max dimension {requested} exceeds lattice dimension {lattice}")]
    DimensionTooLarge { requested: usize, lattice: usize },
    /// A periodic axis too short for cells to be identified by their vertices.
    #[error(
        "Construction error: periodic axis {axis} has corner {value}; periodic axes need at least 2"
    )]
    DegeneratePeriodicAxis { axis: usize, value: usize },
    /// The homology dimension is outside `1..=dimension` of the complex.
    #[error("Construction error: homology dimension {homology} unsupported on a complex of dimension {dimension}")]
    InvalidHomology { homology: usize, dimension: usize },
    /// An inclusion probability outside `[0, 1]`; never clamped.
    #[error("Numerical domain error: inclusion probability {probability} at step {step} is outside [0, 1]")]
    NumericalDomain { probability: f64, step: usize },
    /// The model asked the chain to stop.
    #[error("Early termination requested by the model at step {step}")]
    EarlyTermination { step: usize },
    /// The restricted coboundary has a trivial kernel.
    #[error("Degenerate kernel: restricted coboundary ({rows}x{columns}) has only the zero solution")]
    DegenerateKernel { rows: usize, columns: usize },
    /// A vector or index set does not match the complex.
    #[error("Dimension mismatch: expected length {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl PottsError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PottsError::EmptyCorners
            | PottsError::InvalidCorner { .. }
            | PottsError::InvalidFieldOrder(_)
            | PottsError::DimensionTooLarge { .. }
            | PottsError::DegeneratePeriodicAxis { .. }
            | PottsError::InvalidHomology { .. } => ErrorKind::Construction,
            PottsError::NumericalDomain { .. } => ErrorKind::NumericalDomain,
            PottsError::EarlyTermination { .. } => ErrorKind::EarlyTermination,
            PottsError::DegenerateKernel { .. } => ErrorKind::DegenerateKernel,
            PottsError::DimensionMismatch { .. } => ErrorKind::Usage,
        }
    }

    /// Only early termination is recovered locally.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::EarlyTermination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_variants_share_a_kind() {
        let errs = [
            PottsError::EmptyCorners,
            PottsError::InvalidCorner { axis: 0, value: 0 },
            PottsError::InvalidFieldOrder(6),
            PottsError::DimensionTooLarge { requested: 3, lattice: 2 },
        ];
        for e in errs {
            assert_eq!(e.kind(), ErrorKind::Construction);
            assert!(!e.is_recoverable());
        }
        assert!(PottsError::EarlyTermination { step: 4 }.is_recoverable());
    }

    #[test]
    fn messages_mention_offending_values() {
        let msg = PottsError::NumericalDomain { probability: 1.5, step: 7 }.to_string();
        assert!(msg.contains("1.5") && msg.contains("step 7"), "{msg}");
    }
}
