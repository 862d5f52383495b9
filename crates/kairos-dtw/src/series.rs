//! Time series types with validation guarantees.

use crate::error::DtwError;

/// Scan `values` for the properties every series must have.
fn validate(values: &[f64]) -> Result<(), DtwError> {
    if values.is_empty() {
        return Err(DtwError::EmptySeries);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(DtwError::NonFiniteValue { index });
    }
    Ok(())
}

/// Owned, validated time series. Guaranteed non-empty with all finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries(Vec<f64>);

impl TimeSeries {
    /// Create a new time series, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `values` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, DtwError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        TimeSeriesView(&self.0)
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed series; present for the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Borrowed, validated view into a time series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesView<'a>(&'a [f64]);

impl<'a> TimeSeriesView<'a> {
    /// Create a new view, validating that the slice is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `slice` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, DtwError> {
        validate(slice)?;
        Ok(Self(slice))
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fail with [`DtwError::LengthMismatch`] unless both views have the same length.
    pub(crate) fn ensure_same_len(&self, other: &Self) -> Result<(), DtwError> {
        if self.len() != other.len() {
            return Err(DtwError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }
}
