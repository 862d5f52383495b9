use kairos_dtw::DtwError;

/// Errors from dataset construction, window search and nearest-neighbour prediction.
#[derive(Debug, thiserror::Error)]
pub enum NnError {
    /// Returned when the maximum window fraction is not in (0.0, 1.0].
    #[error("max_window_fraction must be in (0.0, 1.0], got {fraction}")]
    InvalidMaxWindowFraction {
        /// The invalid fraction provided.
        fraction: f64,
    },

    /// Returned when the warp increment between candidates is zero.
    #[error("increment_size must be at least 1, got {increment_size}")]
    InvalidIncrementSize {
        /// The invalid increment provided.
        increment_size: usize,
    },

    /// Returned when predicting with a classifier that holds no training series.
    #[error("model is not fitted or was fitted on an empty training set")]
    ModelNotFitted,

    /// Returned when a query length differs from the training series length.
    #[error("query has {got} time steps, expected {expected}")]
    DimensionMismatch {
        /// The training series length.
        expected: usize,
        /// The query length.
        got: usize,
    },

    /// Returned when leave-one-out evaluation is requested on one series or fewer.
    #[error("leave-one-out evaluation needs at least 2 series, got {n_series}")]
    DegenerateTrainingSet {
        /// The number of series in the training set.
        n_series: usize,
    },

    /// Returned when a dataset row has a different length from the first row.
    #[error("series {index} has {got} time steps, expected {expected}")]
    SeriesLengthMismatch {
        /// Zero-based index of the offending row.
        index: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// Returned when a dataset row fails series validation.
    #[error("series {index} is invalid")]
    InvalidSeries {
        /// Zero-based index of the offending row.
        index: usize,
        /// The underlying validation error.
        source: DtwError,
    },

    /// Returned when a row carries a label missing from the supplied alphabet.
    #[error("label {label:?} is not in the label alphabet")]
    UnknownLabel {
        /// The unrecognized label.
        label: String,
    },

    /// Returned when a label alphabet would have no labels.
    #[error("label alphabet must contain at least one label")]
    EmptyAlphabet,

    /// Returned when evaluating one window candidate fails; the whole search is aborted.
    #[error("window candidate with warp {warp} failed")]
    CandidateFailed {
        /// Warp count of the failing candidate.
        warp: usize,
        /// The underlying distance error.
        source: DtwError,
    },

    /// Returned when a distance computation fails outside window search.
    #[error(transparent)]
    Distance(#[from] DtwError),

    /// Returned when the cancel token fired before the operation completed.
    #[error("operation cancelled")]
    Cancelled,
}
