use crate::potts_error::PottsError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), PottsError>;
}

/// Helper macro to run a fallible check and panic on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Check the face list of a `k`-cell: exactly `2k` distinct faces, each of
/// dimension `k - 1` according to `dimension_of`.
pub(crate) fn check_faces(
    cell: usize,
    k: usize,
    faces: &[usize],
    dimension_of: impl Fn(usize) -> usize,
) -> Result<(), PottsError> {
    if faces.len() != 2 * k {
        return Err(PottsError::DimensionMismatch {
            expected: 2 * k,
            found: faces.len(),
        });
    }
    for (i, &f) in faces.iter().enumerate() {
        if f >= cell || dimension_of(f) + 1 != k {
            return Err(PottsError::DimensionMismatch {
                expected: k.saturating_sub(1),
                found: dimension_of(f),
            });
        }
        if faces[..i].contains(&f) {
            log::warn!("cell {cell} lists face {f} twice");
            return Err(PottsError::DimensionMismatch {
                expected: 2 * k,
                found: i,
            });
        }
    }
    Ok(())
}
