//! Prediction methods for fitted nearest-neighbour models.

use kairos_dtw::TimeSeriesView;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::classifier::NearestNeighborModel;
use crate::dataset::ClassLabel;
use crate::distribution::ClassDistribution;
use crate::error::NnError;
use crate::loocv::nearest;

impl NearestNeighborModel {
    /// Return the index of the training series nearest to `query`.
    ///
    /// Equidistant training series resolve to the earliest one.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::ModelNotFitted`] | The training set is empty |
    /// | [`NnError::DimensionMismatch`] | `query.len()` differs from the training series length |
    /// | [`NnError::Distance`] | `query` holds a non-finite value |
    pub fn nearest_index(&self, query: &[f64]) -> Result<usize, NnError> {
        if self.train.is_empty() {
            return Err(NnError::ModelNotFitted);
        }
        if query.len() != self.train.series_len() {
            return Err(NnError::DimensionMismatch {
                expected: self.train.series_len(),
                got: query.len(),
            });
        }
        let query = TimeSeriesView::new(query)?;
        nearest(query, self.train.rows(), &self.envelopes, self.metric, None)?.ok_or(NnError::ModelNotFitted)
    }

    /// Predict the label of the nearest training series.
    ///
    /// # Errors
    ///
    /// See [`nearest_index`][Self::nearest_index].
    pub fn predict(&self, query: &[f64]) -> Result<ClassLabel, NnError> {
        let index = self.nearest_index(query)?;
        self.train
            .get(index)
            .map(|row| row.label())
            .ok_or(NnError::ModelNotFitted)
    }

    /// Return the one-hot distribution on the predicted label.
    ///
    /// # Errors
    ///
    /// See [`nearest_index`][Self::nearest_index].
    pub fn predict_proba(&self, query: &[f64]) -> Result<ClassDistribution, NnError> {
        Ok(ClassDistribution::one_hot(self.predict(query)?, self.n_classes()))
    }

    /// Predict labels for a batch of queries in parallel.
    ///
    /// # Errors
    ///
    /// Fails on the first query that [`predict`][Self::predict] rejects.
    pub fn predict_batch(&self, queries: &[Vec<f64>]) -> Result<Vec<ClassLabel>, NnError> {
        queries.into_par_iter().map(|q| self.predict(q)).collect()
    }
}
