//! DTW distance computation.

use tracing::instrument;

use crate::constraint::BandConstraint;
use crate::distance::Distance;
use crate::envelope::{SeriesEnvelope, lb_keogh};
use crate::series::TimeSeriesView;
use crate::window::WarpingWindow;

/// Immutable DTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtw {
    constraint: BandConstraint,
}

impl Dtw {
    /// Create an unconstrained DTW calculator.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            constraint: BandConstraint::Unconstrained,
        }
    }

    /// Create a DTW calculator with a Sakoe-Chiba band constraint.
    #[must_use]
    pub fn with_sakoe_chiba(radius: usize) -> Self {
        Self {
            constraint: BandConstraint::SakoeChibaRadius(radius),
        }
    }

    /// Create a DTW calculator for a fractional window on series of length `series_len`.
    #[must_use]
    pub fn with_window(window: WarpingWindow, series_len: usize) -> Self {
        Self {
            constraint: window.constraint(series_len),
        }
    }

    /// Return the band constraint configuration.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Compute the DTW distance between two time series.
    ///
    /// Uses a rolling two-row buffer rather than the full cost matrix. Runs in
    /// O(n * bw) time and O(bw) space, where `bw` is the band width (`m` for
    /// unconstrained, `2r+1` for Sakoe-Chiba radius `r`). Returns
    /// [`Distance::ABANDONED`] only when the band cannot connect `(0, 0)` to
    /// `(n-1, m-1)`, which happens for unequal lengths with a narrow band.
    #[must_use]
    #[instrument(level = "trace", skip(a, b))]
    pub fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> Distance {
        Distance::new(self.rolling(a.as_slice(), b.as_slice(), f64::INFINITY))
    }

    /// Compute DTW distance with early abandoning.
    ///
    /// If the DTW distance would exceed `cutoff`, returns [`Distance::ABANDONED`]
    /// without completing the full computation. This is exact: a finite result
    /// equals `self.distance(a, b)` bit for bit, and a distance equal to the
    /// cutoff is never abandoned.
    #[must_use]
    pub fn distance_with_cutoff(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> Distance {
        Distance::new(self.rolling(a.as_slice(), b.as_slice(), cutoff))
    }

    /// Compute DTW distance with LB_Keogh pruning and early abandoning.
    ///
    /// `envelope_b` must be the envelope of `b` under this calculator's
    /// constraint. If `lb_keogh(a, envelope_b)` strictly exceeds `cutoff` the
    /// pair is abandoned before any DTW work; otherwise this behaves as
    /// [`distance_with_cutoff`][Dtw::distance_with_cutoff].
    #[must_use]
    pub fn distance_pruned(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        envelope_b: &SeriesEnvelope,
        cutoff: f64,
    ) -> Distance {
        if lb_keogh(a.as_slice(), envelope_b) > cutoff {
            return Distance::ABANDONED;
        }
        self.distance_with_cutoff(a, b, cutoff)
    }

    /// Rolling DTW with early abandoning.
    ///
    /// Each row buffer has `bw + 2` slots. Index 0 is the left sentinel (INF)
    /// and index `bw + 1` is the right sentinel (INF). Active columns occupy
    /// indices `1..=bw`.
    ///
    /// For column `j` in row `i`:
    /// - current local index: `j - col_range.start + 1`
    /// - predecessor above `C[i-1][j]`: `j - prev_start + 1` in `prev`
    /// - predecessor diagonal `C[i-1][j-1]`: `j - prev_start` in `prev`
    /// - predecessor left `C[i][j-1]`: `curr_local - 1`
    ///
    /// Accumulated costs are squared; the cutoff stays in distance space and is
    /// compared after `sqrt`, which is monotone, so abandoning never fires for a
    /// pair whose returned distance would be `<= cutoff`.
    fn rolling(&self, a: &[f64], b: &[f64], cutoff: f64) -> f64 {
        let n = a.len();
        let m = b.len();

        let bw = self.constraint.band_width(m);
        let buf_width = bw + 2;
        let cutoff_sq = cutoff * cutoff;

        let mut prev = vec![f64::INFINITY; buf_width];
        let mut curr = vec![f64::INFINITY; buf_width];

        let mut prev_start: usize = 0;

        for i in 0..n {
            curr.fill(f64::INFINITY);

            let col_range = self.constraint.column_range(i, m);
            let curr_start = col_range.start;
            let mut row_min = f64::INFINITY;

            for j in col_range {
                let cost = (a[i] - b[j]).powi(2);
                let cj = j - curr_start + 1;

                if i == 0 && j == 0 {
                    curr[cj] = cost;
                    row_min = row_min.min(cost);
                    continue;
                }

                let left = curr[cj - 1];

                let above = if i > 0 {
                    let pj = j.wrapping_sub(prev_start).wrapping_add(1);
                    if pj < buf_width { prev[pj] } else { f64::INFINITY }
                } else {
                    f64::INFINITY
                };

                let diag = if i > 0 && j > 0 {
                    let pj = j.wrapping_sub(prev_start);
                    if pj < buf_width { prev[pj] } else { f64::INFINITY }
                } else {
                    f64::INFINITY
                };

                let val = cost + left.min(above).min(diag);
                curr[cj] = val;
                row_min = row_min.min(val);
            }

            // Every warping path crosses each row, and accumulated cost never
            // decreases along a path, so `row_min` bounds the final cost from below.
            if i + 1 < n && row_min > cutoff_sq && row_min.sqrt() > cutoff {
                return f64::INFINITY;
            }

            prev_start = curr_start;
            std::mem::swap(&mut prev, &mut curr);
        }

        // `prev` holds the last completed row after the final swap.
        let final_range = self.constraint.column_range(n - 1, m);
        if !final_range.contains(&(m - 1)) {
            return f64::INFINITY;
        }
        let dist = prev[(m - 1) - final_range.start + 1].sqrt();
        if dist > cutoff {
            return f64::INFINITY;
        }
        dist
    }
}
