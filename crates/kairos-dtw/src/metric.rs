//! The distance-metric capability consumed by nearest-neighbour search.

use std::fmt;

use crate::distance::Distance;
use crate::dtw::Dtw;
use crate::envelope::SeriesEnvelope;
use crate::error::DtwError;
use crate::euclidean::euclidean_with_cutoff;
use crate::series::TimeSeriesView;
use crate::window::WarpingWindow;

/// A distance over pairs of equal-length series.
///
/// The warping window is part of the value, so a metric is immutable once
/// built and can be shared freely across threads. Searching over windows
/// means building one metric per candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceMetric {
    /// Plain Euclidean distance.
    Euclidean,
    /// DTW restricted to a Sakoe-Chiba window given as a fraction of the series length.
    Dtw(WarpingWindow),
}

impl DistanceMetric {
    /// Windowed DTW with window fraction `fraction`.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidWindowFraction`] if `fraction` is outside `[0, 1]`.
    pub fn dtw(fraction: f64) -> Result<Self, DtwError> {
        Ok(Self::Dtw(WarpingWindow::new(fraction)?))
    }

    /// Full-window DTW.
    #[must_use]
    pub fn full_dtw() -> Self {
        Self::Dtw(WarpingWindow::FULL)
    }

    /// Return the warping window; Euclidean distance never warps.
    #[must_use]
    pub fn window(&self) -> WarpingWindow {
        match self {
            Self::Euclidean => WarpingWindow::NONE,
            Self::Dtw(window) => *window,
        }
    }

    /// Return the same metric family with a different window.
    ///
    /// Euclidean distance has no window and is returned unchanged.
    #[must_use]
    pub fn with_window(self, window: WarpingWindow) -> Self {
        match self {
            Self::Euclidean => Self::Euclidean,
            Self::Dtw(_) => Self::Dtw(window),
        }
    }

    /// Compute the full distance between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::LengthMismatch`] if the series differ in length.
    pub fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> Result<Distance, DtwError> {
        self.distance_with_cutoff(a, b, f64::INFINITY)
    }

    /// Compute the distance, abandoning once it provably exceeds `best_so_far`.
    ///
    /// Never returns a value smaller than [`distance`][Self::distance]; when
    /// nothing is abandoned the result is identical to it.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::LengthMismatch`] if the series differ in length.
    pub fn distance_with_cutoff(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        best_so_far: f64,
    ) -> Result<Distance, DtwError> {
        a.ensure_same_len(&b)?;
        let d = match self {
            Self::Euclidean => {
                Distance::new(euclidean_with_cutoff(a.as_slice(), b.as_slice(), best_so_far))
            }
            Self::Dtw(window) => Dtw::with_window(*window, a.len()).distance_with_cutoff(a, b, best_so_far),
        };
        Ok(d)
    }

    /// Like [`distance_with_cutoff`][Self::distance_with_cutoff], first checking
    /// the LB_Keogh bound against `envelope_b` when one is supplied.
    ///
    /// `envelope_b` must come from [`envelope`][Self::envelope] on this metric.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::LengthMismatch`] if the series differ in length.
    pub fn distance_pruned(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        envelope_b: Option<&SeriesEnvelope>,
        best_so_far: f64,
    ) -> Result<Distance, DtwError> {
        match (self, envelope_b) {
            (Self::Dtw(window), Some(env)) => {
                a.ensure_same_len(&b)?;
                Ok(Dtw::with_window(*window, a.len()).distance_pruned(a, b, env, best_so_far))
            }
            _ => self.distance_with_cutoff(a, b, best_so_far),
        }
    }

    /// Compute the pruning envelope of `series`, or `None` for metrics without one.
    #[must_use]
    pub fn envelope(&self, series: TimeSeriesView<'_>) -> Option<SeriesEnvelope> {
        match self {
            Self::Euclidean => None,
            Self::Dtw(window) => Some(SeriesEnvelope::compute(series, window.constraint(series.len()))),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => f.write_str("euclidean"),
            Self::Dtw(window) => write!(f, "dtw({window})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;

    fn ts(values: &[f64]) -> TimeSeries {
        TimeSeries::new(values.to_vec()).unwrap()
    }

    #[test]
    fn zero_window_dtw_equals_euclidean() {
        let a = ts(&[1.0, 5.0, 2.0, 8.0, 3.0]);
        let b = ts(&[2.0, 4.0, 7.0, 1.0, 0.0]);
        let ed = DistanceMetric::Euclidean.distance(a.as_view(), b.as_view()).unwrap();
        let dtw0 = DistanceMetric::dtw(0.0).unwrap().distance(a.as_view(), b.as_view()).unwrap();
        assert_eq!(ed, dtw0);
    }

    #[test]
    fn rejects_length_mismatch() {
        let a = ts(&[1.0, 2.0]);
        let b = ts(&[1.0, 2.0, 3.0]);
        for metric in [DistanceMetric::Euclidean, DistanceMetric::full_dtw()] {
            assert_eq!(
                metric.distance(a.as_view(), b.as_view()),
                Err(DtwError::LengthMismatch { left: 2, right: 3 })
            );
        }
    }

    #[test]
    fn rejects_invalid_window() {
        assert!(DistanceMetric::dtw(1.5).is_err());
        assert!(DistanceMetric::dtw(-0.1).is_err());
    }

    #[test]
    fn window_accessors() {
        assert_eq!(DistanceMetric::Euclidean.window(), WarpingWindow::NONE);
        assert_eq!(DistanceMetric::full_dtw().window(), WarpingWindow::FULL);
        let w = WarpingWindow::from_warp(2, 10);
        assert_eq!(DistanceMetric::full_dtw().with_window(w).window(), w);
        assert_eq!(DistanceMetric::Euclidean.with_window(w), DistanceMetric::Euclidean);
    }

    #[test]
    fn pruned_without_envelope_matches_cutoff() {
        let a = ts(&[0.0, 1.0, 2.0, 3.0]);
        let b = ts(&[3.0, 2.0, 1.0, 0.0]);
        let metric = DistanceMetric::dtw(0.25).unwrap();
        let env = metric.envelope(b.as_view());
        assert!(env.is_some());
        let plain = metric.distance(a.as_view(), b.as_view()).unwrap();
        let pruned = metric
            .distance_pruned(a.as_view(), b.as_view(), env.as_ref(), f64::INFINITY)
            .unwrap();
        assert_eq!(plain, pruned);
        assert!(DistanceMetric::Euclidean.envelope(b.as_view()).is_none());
    }

    #[test]
    fn display_names() {
        assert_eq!(DistanceMetric::Euclidean.to_string(), "euclidean");
        assert_eq!(DistanceMetric::full_dtw().to_string(), "dtw(r=1.0000)");
    }
}
