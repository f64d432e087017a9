//! Error types for grid construction.

use thiserror::Error;

/// Errors arising from grid construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// One of the three axes has zero cells.
    #[error("grid axis '{axis}' has zero cells")]
    EmptyAxis {
        /// Name of the empty axis (`x`, `y`, or `eta`).
        axis: &'static str,
    },
    /// `nx * ny * neta` does not fit in `usize`.
    #[error("cell count {nx} x {ny} x {neta} overflows usize")]
    CellCountOverflow {
        /// Cells along x.
        nx: usize,
        /// Cells along y.
        ny: usize,
        /// Cells along eta.
        neta: usize,
    },
    /// The generations of a ring do not share the same dimensions.
    #[error("grid generations differ in shape: {expected:?} vs {found:?}")]
    ShapeMismatch {
        /// Dimensions of the first generation.
        expected: (usize, usize, usize),
        /// Dimensions of the mismatching generation.
        found: (usize, usize, usize),
    },
}
