//! Stencil behaviour at the grid edges.

/// How stencil lookups resolve indices beyond the grid edge.
///
/// # Examples
///
/// ```
/// use tauflow_grid::EdgeBehavior;
///
/// assert_eq!(EdgeBehavior::Clamp.resolve(-2, 5), 0);
/// assert_eq!(EdgeBehavior::Wrap.resolve(-1, 5), 4);
/// assert_eq!(EdgeBehavior::Wrap.resolve(6, 5), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-range neighbours repeat the boundary cell (zero gradient).
    #[default]
    Clamp,
    /// Out-of-range neighbours wrap to the opposite side (periodic).
    Wrap,
}

impl EdgeBehavior {
    /// Resolve a possibly out-of-range index on an axis of length `len`.
    ///
    /// `len` must be non-zero; [`Grid`](crate::Grid) guarantees this.
    pub fn resolve(self, idx: isize, len: usize) -> usize {
        let n = len as isize;
        if (0..n).contains(&idx) {
            return idx as usize;
        }
        match self {
            Self::Clamp => idx.clamp(0, n - 1) as usize,
            Self::Wrap => idx.rem_euclid(n) as usize,
        }
    }
}
