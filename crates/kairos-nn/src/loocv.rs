//! Nearest-neighbour scans and leave-one-out evaluation.

use kairos_dtw::{DistanceMetric, DtwError, SeriesEnvelope, TimeSeriesView};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::confusion::ConfusionMatrix;
use crate::dataset::{ClassLabel, Dataset, LabeledSeries};
use crate::error::NnError;

/// Leave-one-out accuracy of a fixed metric on its own training set.
#[derive(Debug, Clone)]
pub struct TrainEstimate {
    /// Fraction of series whose nearest other series shares their label.
    pub accuracy: f64,
    /// Predicted label for each training series, in dataset order.
    pub predictions: Vec<ClassLabel>,
    /// Confusion matrix of true against predicted labels.
    pub confusion: ConfusionMatrix,
}

impl TrainEstimate {
    pub(crate) fn new(dataset: &Dataset, predictions: Vec<ClassLabel>) -> Self {
        let confusion = ConfusionMatrix::from_labels(&dataset.labels(), &predictions, dataset.n_classes());
        Self {
            accuracy: confusion.accuracy(),
            predictions,
            confusion,
        }
    }

    /// Number of correctly classified series.
    #[must_use]
    pub fn n_correct(&self) -> usize {
        self.confusion.n_correct()
    }
}

/// Compute the pruning envelope of every row under `metric`.
pub(crate) fn envelopes(rows: &[LabeledSeries], metric: DistanceMetric) -> Vec<Option<SeriesEnvelope>> {
    rows.iter().map(|row| metric.envelope(row.series())).collect()
}

/// Index of the row nearest to `query`, skipping `exclude`.
///
/// Scans in order and replaces the running best only on a strictly smaller
/// distance, so the first of several equidistant rows wins. Returns `None`
/// when no row is eligible.
pub(crate) fn nearest(
    query: TimeSeriesView<'_>,
    rows: &[LabeledSeries],
    envelopes: &[Option<SeriesEnvelope>],
    metric: DistanceMetric,
    exclude: Option<usize>,
) -> Result<Option<usize>, DtwError> {
    let mut best_idx = None;
    let mut best = f64::INFINITY;

    for (j, row) in rows.iter().enumerate() {
        if Some(j) == exclude {
            continue;
        }
        if best_idx.is_none() {
            best_idx = Some(j);
        }
        let envelope = envelopes.get(j).and_then(Option::as_ref);
        let d = metric.distance_pruned(query, row.series(), envelope, best)?;
        if d.value() < best {
            best = d.value();
            best_idx = Some(j);
        }
    }
    Ok(best_idx)
}

/// Predict every row from its nearest other row, in parallel over held-out rows.
pub(crate) fn loocv_predictions(dataset: &Dataset, metric: DistanceMetric) -> Result<Vec<ClassLabel>, DtwError> {
    let rows = dataset.rows();
    let envelopes = envelopes(rows, metric);
    (0..rows.len())
        .into_par_iter()
        .map(|i| {
            let nn = nearest(rows[i].series(), rows, &envelopes, metric, Some(i))?;
            // At least two rows, so some other row is always found.
            Ok(nn.map_or(rows[i].label(), |j| rows[j].label()))
        })
        .collect()
}

/// Fail unless leave-one-out is defined for `dataset`.
pub(crate) fn ensure_loocv_possible(dataset: &Dataset) -> Result<(), NnError> {
    if dataset.len() <= 1 {
        return Err(NnError::DegenerateTrainingSet {
            n_series: dataset.len(),
        });
    }
    Ok(())
}

/// Leave-one-out 1-NN evaluation of `metric` on `dataset`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`NnError::DegenerateTrainingSet`] | `dataset` has fewer than 2 series |
/// | [`NnError::Distance`] | A distance computation fails |
pub fn leave_one_out(dataset: &Dataset, metric: DistanceMetric) -> Result<TrainEstimate, NnError> {
    ensure_loocv_possible(dataset)?;
    let predictions = loocv_predictions(dataset, metric)?;
    Ok(TrainEstimate::new(dataset, predictions))
}
