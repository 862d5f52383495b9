//! Leave-one-out search over DTW warping windows.

use kairos_dtw::{DistanceMetric, WarpingWindow};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::cancel::CancelToken;
use crate::dataset::Dataset;
use crate::error::NnError;
use crate::loocv::{TrainEstimate, ensure_loocv_possible, loocv_predictions};

/// Bounded grid search for the DTW window with the best leave-one-out accuracy.
///
/// Candidates are the warp counts `0, s, 2s, ...` up to
/// `floor(max_window_fraction * L)` for series length `L` and increment `s`,
/// each evaluated at window fraction `warp / L`.
///
/// # Defaults
///
/// | Parameter             | Default |
/// |-----------------------|---------|
/// | `max_window_fraction` | 1.0     |
/// | `increment_size`      | 1       |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSearch {
    max_window: WarpingWindow,
    increment_size: usize,
}

/// The winning candidate of a [`WindowSearch`].
#[derive(Debug, Clone)]
pub struct WindowCandidate {
    /// Warp count of the candidate.
    pub warp: usize,
    /// Window fraction `warp / series_len`.
    pub window: WarpingWindow,
    /// Leave-one-out evaluation at this window.
    pub estimate: TrainEstimate,
}

impl WindowSearch {
    /// Create a search over windows up to `max_window_fraction`, stepping `increment_size` warps.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::InvalidMaxWindowFraction`] | `max_window_fraction` is not in (0.0, 1.0] |
    /// | [`NnError::InvalidIncrementSize`] | `increment_size` is zero |
    pub fn new(max_window_fraction: f64, increment_size: usize) -> Result<Self, NnError> {
        if !(max_window_fraction > 0.0 && max_window_fraction <= 1.0) {
            return Err(NnError::InvalidMaxWindowFraction {
                fraction: max_window_fraction,
            });
        }
        if increment_size == 0 {
            return Err(NnError::InvalidIncrementSize { increment_size });
        }
        let max_window = WarpingWindow::new(max_window_fraction).map_err(|_| NnError::InvalidMaxWindowFraction {
            fraction: max_window_fraction,
        })?;
        Ok(Self {
            max_window,
            increment_size,
        })
    }

    /// Return the upper bound on the window fraction.
    #[must_use]
    pub fn max_window_fraction(&self) -> f64 {
        self.max_window.fraction()
    }

    /// Return the warp step between candidates.
    #[must_use]
    pub fn increment_size(&self) -> usize {
        self.increment_size
    }

    /// Warp counts evaluated for series of length `series_len`, ascending.
    #[must_use]
    pub fn candidate_warps(&self, series_len: usize) -> Vec<usize> {
        (0..=self.max_window.radius(series_len))
            .step_by(self.increment_size)
            .collect()
    }

    /// Evaluate every candidate and return the most accurate one.
    ///
    /// Candidates run in parallel with their own immutable metric. Among
    /// candidates with equal accuracy the smallest warp wins. The cancel
    /// token is checked before each candidate starts.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::DegenerateTrainingSet`] | `dataset` has fewer than 2 series |
    /// | [`NnError::CandidateFailed`] | Any candidate's evaluation fails |
    /// | [`NnError::Cancelled`] | `cancel` fired during the search |
    #[instrument(skip_all, fields(n_series = dataset.len(), series_len = dataset.series_len()))]
    pub fn run(&self, dataset: &Dataset, cancel: &CancelToken) -> Result<WindowCandidate, NnError> {
        ensure_loocv_possible(dataset)?;
        let series_len = dataset.series_len();
        let warps = self.candidate_warps(series_len);
        info!(
            n_candidates = warps.len(),
            max_window_fraction = self.max_window.fraction(),
            increment_size = self.increment_size,
            "starting window search"
        );

        let candidates: Vec<WindowCandidate> = warps
            .into_par_iter()
            .map(|warp| {
                cancel.check()?;
                let window = WarpingWindow::from_warp(warp, series_len);
                let predictions = loocv_predictions(dataset, DistanceMetric::Dtw(window))
                    .map_err(|source| NnError::CandidateFailed { warp, source })?;
                let estimate = TrainEstimate::new(dataset, predictions);
                debug!(warp, accuracy = estimate.accuracy, "window candidate evaluated");
                Ok(WindowCandidate {
                    warp,
                    window,
                    estimate,
                })
            })
            .collect::<Result<_, NnError>>()?;

        let mut candidates = candidates.into_iter();
        // Warp 0 is always a candidate.
        let Some(mut best) = candidates.next() else {
            return Err(NnError::DegenerateTrainingSet {
                n_series: dataset.len(),
            });
        };
        for candidate in candidates {
            if candidate.estimate.n_correct() > best.estimate.n_correct() {
                best = candidate;
            }
        }

        info!(
            warp = best.warp,
            window = best.window.fraction(),
            accuracy = best.estimate.accuracy,
            "window search complete"
        );
        Ok(best)
    }
}

impl Default for WindowSearch {
    fn default() -> Self {
        Self {
            max_window: WarpingWindow::FULL,
            increment_size: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loocv::leave_one_out;

    fn dataset(rows: &[(&[f64], &str)]) -> Dataset {
        Dataset::new(rows.iter().map(|(v, l)| (v.to_vec(), *l)).collect()).unwrap()
    }

    /// Shifted bumps: class identity is the bump width, position varies.
    fn shifted_bumps() -> Dataset {
        let bump = |start: usize, width: usize| -> Vec<f64> {
            (0..12).map(|i| if (start..start + width).contains(&i) { 1.0 } else { 0.0 }).collect()
        };
        let rows = vec![
            (bump(1, 2), "narrow"),
            (bump(4, 2), "narrow"),
            (bump(7, 2), "narrow"),
            (bump(2, 5), "wide"),
            (bump(5, 5), "wide"),
            (bump(0, 5), "wide"),
        ];
        Dataset::new(rows).unwrap()
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            WindowSearch::new(0.0, 1),
            Err(NnError::InvalidMaxWindowFraction { .. })
        ));
        assert!(matches!(
            WindowSearch::new(1.5, 1),
            Err(NnError::InvalidMaxWindowFraction { .. })
        ));
        assert!(matches!(
            WindowSearch::new(f64::NAN, 1),
            Err(NnError::InvalidMaxWindowFraction { .. })
        ));
        assert!(matches!(
            WindowSearch::new(0.5, 0),
            Err(NnError::InvalidIncrementSize { increment_size: 0 })
        ));
    }

    #[test]
    fn candidate_grid() {
        let search = WindowSearch::new(0.5, 2).unwrap();
        assert_eq!(search.candidate_warps(10), vec![0, 2, 4]);
        let search = WindowSearch::new(0.25, 1).unwrap();
        assert_eq!(search.candidate_warps(10), vec![0, 1, 2]);
        assert_eq!(WindowSearch::default().candidate_warps(3), vec![0, 1, 2, 3]);
    }

    #[test]
    fn single_class_selects_zero_window() {
        let ds = dataset(&[
            (&[0.0, 1.0, 2.0, 3.0], "only"),
            (&[3.0, 2.0, 1.0, 0.0], "only"),
            (&[1.0, 1.0, 1.0, 1.0], "only"),
        ]);
        let best = WindowSearch::default().run(&ds, &CancelToken::new()).unwrap();
        assert_eq!(best.warp, 0);
        assert_eq!(best.window, WarpingWindow::NONE);
        assert_eq!(best.estimate.accuracy, 1.0);
    }

    #[test]
    fn selection_is_reproducible() {
        let ds = shifted_bumps();
        let best = WindowSearch::default().run(&ds, &CancelToken::new()).unwrap();
        let manual = leave_one_out(&ds, DistanceMetric::Dtw(best.window)).unwrap();
        assert_eq!(manual.accuracy, best.estimate.accuracy);
        assert_eq!(manual.predictions, best.estimate.predictions);
    }

    #[test]
    fn no_candidate_beats_the_winner() {
        let ds = shifted_bumps();
        let search = WindowSearch::default();
        let best = search.run(&ds, &CancelToken::new()).unwrap();
        for warp in search.candidate_warps(ds.series_len()) {
            let window = WarpingWindow::from_warp(warp, ds.series_len());
            let est = leave_one_out(&ds, DistanceMetric::Dtw(window)).unwrap();
            assert!(est.accuracy <= best.estimate.accuracy);
            if warp < best.warp {
                assert!(est.accuracy < best.estimate.accuracy, "earlier warp {warp} ties the winner");
            }
        }
    }

    #[test]
    fn degenerate_training_sets_fail() {
        let ds = dataset(&[(&[0.0, 1.0], "a")]);
        let err = WindowSearch::default().run(&ds, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, NnError::DegenerateTrainingSet { n_series: 1 }));
    }

    #[test]
    fn cancelled_search_returns_no_result() {
        let token = CancelToken::new();
        token.cancel();
        let err = WindowSearch::default().run(&shifted_bumps(), &token).unwrap_err();
        assert!(matches!(err, NnError::Cancelled));
    }
}
