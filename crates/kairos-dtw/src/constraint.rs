//! Band constraint applied to the DTW cost matrix.

use std::ops::Range;

/// Constraint on which cells of the DTW cost matrix a warping path may visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BandConstraint {
    /// No constraint. The full cost matrix is computed.
    #[default]
    Unconstrained,

    /// Sakoe-Chiba band: cell (i,j) is valid only if |i - j| <= radius.
    SakoeChibaRadius(usize),
}

impl BandConstraint {
    /// Return the valid column range for a given row in the cost matrix.
    ///
    /// For unconstrained DTW, returns `0..n_cols`.
    /// For Sakoe-Chiba, returns the intersection of `[row - r, row + r]` with `[0, n_cols)`.
    #[must_use]
    pub fn column_range(&self, row: usize, n_cols: usize) -> Range<usize> {
        match self {
            Self::Unconstrained => 0..n_cols,
            Self::SakoeChibaRadius(r) => {
                let start = row.saturating_sub(*r);
                let end = (row + r + 1).min(n_cols);
                start..end
            }
        }
    }

    /// Return the maximum number of valid cells in any row of an `_ x n_cols` matrix.
    #[must_use]
    pub fn band_width(&self, n_cols: usize) -> usize {
        match self {
            Self::Unconstrained => n_cols,
            Self::SakoeChibaRadius(r) => (2 * r + 1).min(n_cols),
        }
    }

    /// Return the radius this constraint allows for series of length `len`.
    #[must_use]
    pub fn radius(&self, len: usize) -> usize {
        match self {
            Self::Unconstrained => len,
            Self::SakoeChibaRadius(r) => (*r).min(len),
        }
    }
}
