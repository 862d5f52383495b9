//! Error types for series validation and distance computation.

/// Errors from time series validation and distance computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty slice is provided as a time series.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a time series contains NaN, infinity, or negative infinity.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when a warping window fraction falls outside `[0, 1]`.
    #[error("warping window fraction must be in [0, 1], got {fraction}")]
    InvalidWindowFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when two series of different lengths are compared.
    #[error("cannot compare series of length {left} with series of length {right}")]
    LengthMismatch {
        /// Length of the first operand.
        left: usize,
        /// Length of the second operand.
        right: usize,
    },
}
