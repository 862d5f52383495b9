//! Warping window expressed as a fraction of the series length.

use std::fmt;

use crate::constraint::BandConstraint;
use crate::error::DtwError;

/// Slack added before flooring `fraction * len` so that a fraction built as
/// `warp / len` always maps back to exactly `warp`.
const RADIUS_EPSILON: f64 = 1e-9;

/// Sakoe-Chiba warping window as a fraction `r` of the series length, `0 <= r <= 1`.
///
/// `r = 0` permits no warping (equivalent to Euclidean distance) and `r = 1`
/// permits the full cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct WarpingWindow(f64);

impl WarpingWindow {
    /// No warping.
    pub const NONE: Self = Self(0.0);

    /// Full warping.
    pub const FULL: Self = Self(1.0);

    /// Create a window from a fraction of the series length.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidWindowFraction`] if `fraction` is not a finite value in `[0, 1]`.
    pub fn new(fraction: f64) -> Result<Self, DtwError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(DtwError::InvalidWindowFraction { fraction });
        }
        Ok(Self(fraction))
    }

    /// Create the window allowing `warp` steps of warping on series of length `series_len`.
    ///
    /// `warp` values beyond `series_len` saturate at [`WarpingWindow::FULL`];
    /// a zero `series_len` yields [`WarpingWindow::NONE`].
    #[must_use]
    pub fn from_warp(warp: usize, series_len: usize) -> Self {
        if series_len == 0 {
            return Self::NONE;
        }
        Self((warp as f64 / series_len as f64).min(1.0))
    }

    /// Return the window fraction `r`.
    #[must_use]
    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Return the band radius (warp count) for series of length `series_len`.
    #[must_use]
    pub fn radius(self, series_len: usize) -> usize {
        let radius = (self.0 * series_len as f64 + RADIUS_EPSILON).floor() as usize;
        radius.min(series_len)
    }

    /// Return the band constraint for series of length `series_len`.
    #[must_use]
    pub fn constraint(self, series_len: usize) -> BandConstraint {
        BandConstraint::SakoeChibaRadius(self.radius(series_len))
    }
}

impl fmt::Display for WarpingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r={:.4}", self.0)
    }
}
