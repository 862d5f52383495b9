//! Configuration builder for nearest-neighbour training.

use std::fmt;

use kairos_dtw::DistanceMetric;

use crate::cancel::CancelToken;
use crate::classifier::{NearestNeighborModel, train};
use crate::dataset::Dataset;
use crate::error::NnError;
use crate::search::WindowSearch;

/// How the fitted metric's warping window is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowPolicy {
    /// Use this metric as given.
    Fixed(DistanceMetric),
    /// Select a DTW window by leave-one-out search.
    Search(WindowSearch),
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(metric) => write!(f, "fixed {metric}"),
            Self::Search(search) => write!(
                f,
                "dtw search (max r={}, step {})",
                search.max_window_fraction(),
                search.increment_size()
            ),
        }
    }
}

/// Whether a fixed-window fit also computes its leave-one-out accuracy.
///
/// A searched fit always has an estimate: it is the winning candidate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainEstimateMode {
    /// Run leave-one-out evaluation after fitting.
    Enabled,
    /// Skip it.
    Disabled,
}

/// Configuration for 1-nearest-neighbour training.
///
/// Construct via [`NearestNeighborConfig::new`] (or the `fixed`/`searched`
/// shorthands), then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter        | Default            |
/// |------------------|--------------------|
/// | `train_estimate` | `Disabled`         |
/// | `cancel_token`   | a fresh token      |
#[derive(Debug, Clone)]
pub struct NearestNeighborConfig {
    pub(crate) policy: WindowPolicy,
    pub(crate) train_estimate: TrainEstimateMode,
    pub(crate) cancel: CancelToken,
}

impl NearestNeighborConfig {
    /// Create a config with the given window policy.
    #[must_use]
    pub fn new(policy: WindowPolicy) -> Self {
        Self {
            policy,
            train_estimate: TrainEstimateMode::Disabled,
            cancel: CancelToken::new(),
        }
    }

    /// Shorthand for a fixed metric.
    #[must_use]
    pub fn fixed(metric: DistanceMetric) -> Self {
        Self::new(WindowPolicy::Fixed(metric))
    }

    /// Shorthand for a window search.
    #[must_use]
    pub fn searched(search: WindowSearch) -> Self {
        Self::new(WindowPolicy::Search(search))
    }

    // --- Setters ---

    /// Set whether fixed-window fits compute a leave-one-out estimate.
    #[must_use]
    pub fn with_train_estimate(mut self, mode: TrainEstimateMode) -> Self {
        self.train_estimate = mode;
        self
    }

    /// Share a cancel token with the caller.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    // --- Getters ---

    /// Return the window policy.
    #[must_use]
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Return the train-estimate mode.
    #[must_use]
    pub fn train_estimate(&self) -> TrainEstimateMode {
        self.train_estimate
    }

    /// Return the cancel token.
    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Fit a model on `dataset`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::DegenerateTrainingSet`] | Leave-one-out is required and `dataset` has fewer than 2 series |
    /// | [`NnError::CandidateFailed`] | A window candidate fails during search |
    /// | [`NnError::Distance`] | A distance computation fails during a fixed-window estimate |
    /// | [`NnError::Cancelled`] | The cancel token fired |
    pub fn fit(&self, dataset: &Dataset) -> Result<NearestNeighborModel, NnError> {
        train(self, dataset)
    }
}
