//! Fitted 1-nearest-neighbour models.

use kairos_dtw::{DistanceMetric, SeriesEnvelope, WarpingWindow};
use tracing::{info, instrument};

use crate::config::{NearestNeighborConfig, TrainEstimateMode, WindowPolicy};
use crate::dataset::{ClassLabel, Dataset, LabelAlphabet};
use crate::distribution::ClassDistribution;
use crate::error::NnError;
use crate::loocv::{TrainEstimate, envelopes, leave_one_out};

/// A 1-NN model with its metric's window fixed.
///
/// Holds a shared handle to the training set and the per-series pruning
/// envelopes; read-only after fitting.
#[derive(Debug, Clone)]
pub struct NearestNeighborModel {
    pub(crate) metric: DistanceMetric,
    pub(crate) train: Dataset,
    pub(crate) envelopes: Vec<Option<SeriesEnvelope>>,
    pub(crate) estimate: Option<TrainEstimate>,
}

/// Fit a model according to `config`.
#[instrument(skip_all, fields(n_series = dataset.len(), series_len = dataset.series_len()))]
pub(crate) fn train(config: &NearestNeighborConfig, dataset: &Dataset) -> Result<NearestNeighborModel, NnError> {
    config.cancel.check()?;
    info!(policy = %config.policy, "fitting nearest-neighbour model");

    let (metric, estimate) = match config.policy {
        WindowPolicy::Search(search) => {
            let best = search.run(dataset, &config.cancel)?;
            (DistanceMetric::Dtw(best.window), Some(best.estimate))
        }
        WindowPolicy::Fixed(metric) => {
            let estimate = match config.train_estimate {
                TrainEstimateMode::Enabled => Some(leave_one_out(dataset, metric)?),
                TrainEstimateMode::Disabled => None,
            };
            (metric, estimate)
        }
    };

    let envelopes = envelopes(dataset.rows(), metric);
    info!(
        metric = %metric,
        accuracy = ?estimate.as_ref().map(|e| e.accuracy),
        "nearest-neighbour model fitted"
    );

    Ok(NearestNeighborModel {
        metric,
        train: dataset.clone(),
        envelopes,
        estimate,
    })
}

impl NearestNeighborModel {
    /// Return the fitted metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Return the fitted warping window; [`WarpingWindow::NONE`] for Euclidean distance.
    #[must_use]
    pub fn selected_window(&self) -> WarpingWindow {
        self.metric.window()
    }

    /// Return the leave-one-out estimate, if one was computed.
    #[must_use]
    pub fn train_estimate(&self) -> Option<&TrainEstimate> {
        self.estimate.as_ref()
    }

    /// Return the training set.
    #[must_use]
    pub fn training_set(&self) -> &Dataset {
        &self.train
    }

    /// Return the label alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &LabelAlphabet {
        self.train.alphabet()
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.train.n_classes()
    }

    /// Return the training series length.
    #[must_use]
    pub fn series_len(&self) -> usize {
        self.train.series_len()
    }
}

/// A trainable 1-NN classifier that remembers its last fit.
///
/// Use this where a model must exist before training, such as inside an
/// ensemble member; otherwise [`NearestNeighborConfig::fit`] returns the
/// model directly.
#[derive(Debug, Clone)]
pub struct NearestNeighborClassifier {
    config: NearestNeighborConfig,
    model: Option<NearestNeighborModel>,
}

impl NearestNeighborClassifier {
    /// Create an unfitted classifier.
    #[must_use]
    pub fn new(config: NearestNeighborConfig) -> Self {
        Self { config, model: None }
    }

    /// Fit on `dataset`, replacing any previous model.
    ///
    /// A failed fit leaves the classifier unfitted.
    ///
    /// # Errors
    ///
    /// See [`NearestNeighborConfig::fit`].
    pub fn train(&mut self, dataset: &Dataset) -> Result<&NearestNeighborModel, NnError> {
        self.model = None;
        let model = self.config.fit(dataset)?;
        Ok(&*self.model.insert(model))
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &NearestNeighborConfig {
        &self.config
    }

    /// Return true once [`train`][Self::train] has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Return the fitted model.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::ModelNotFitted`] before a successful [`train`][Self::train].
    pub fn model(&self) -> Result<&NearestNeighborModel, NnError> {
        self.model.as_ref().ok_or(NnError::ModelNotFitted)
    }

    /// Return the fitted warping window.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::ModelNotFitted`] before a successful [`train`][Self::train].
    pub fn selected_window(&self) -> Result<WarpingWindow, NnError> {
        Ok(self.model()?.selected_window())
    }

    /// Predict the label of `query`.
    ///
    /// # Errors
    ///
    /// See [`NearestNeighborModel::predict`]; also [`NnError::ModelNotFitted`] before training.
    pub fn predict(&self, query: &[f64]) -> Result<ClassLabel, NnError> {
        self.model()?.predict(query)
    }

    /// Return the one-hot class distribution of `query`.
    ///
    /// # Errors
    ///
    /// See [`NearestNeighborModel::predict`]; also [`NnError::ModelNotFitted`] before training.
    pub fn predict_proba(&self, query: &[f64]) -> Result<ClassDistribution, NnError> {
        self.model()?.predict_proba(query)
    }
}
