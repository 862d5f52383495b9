//! Labeled, equal-length training data and its label alphabet.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use kairos_dtw::{TimeSeries, TimeSeriesView};

use crate::error::NnError;

/// Index of a class in a [`LabelAlphabet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassLabel(usize);

impl ClassLabel {
    /// Create a label from its alphabet index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the alphabet index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class_{}", self.0)
    }
}

/// The fixed, sorted set of class names a dataset draws its labels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAlphabet {
    names: Vec<String>,
}

impl LabelAlphabet {
    /// Build an alphabet from label names. Duplicates collapse and names are sorted.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::EmptyAlphabet`] if `names` yields nothing.
    pub fn new<I, S>(names: I) -> Result<Self, NnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: BTreeSet<String> = names.into_iter().map(|s| s.as_ref().to_owned()).collect();
        if names.is_empty() {
            return Err(NnError::EmptyAlphabet);
        }
        Ok(Self {
            names: names.into_iter().collect(),
        })
    }

    /// Return the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false` for a constructed alphabet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up the label for a class name.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<ClassLabel> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
            .map(ClassLabel)
    }

    /// Return the class name for a label, or `None` if it is out of range.
    #[must_use]
    pub fn name(&self, label: ClassLabel) -> Option<&str> {
        self.names.get(label.0).map(String::as_str)
    }

    /// Iterate over all labels in alphabet order.
    pub fn labels(&self) -> impl Iterator<Item = ClassLabel> + '_ {
        (0..self.names.len()).map(ClassLabel)
    }
}

/// One training series with its class.
#[derive(Debug, Clone)]
pub struct LabeledSeries {
    series: TimeSeries,
    label: ClassLabel,
}

impl LabeledSeries {
    /// Return a view of the series values.
    #[must_use]
    pub fn series(&self) -> TimeSeriesView<'_> {
        self.series.as_view()
    }

    /// Return the class label.
    #[must_use]
    pub fn label(&self) -> ClassLabel {
        self.label
    }
}

/// An immutable, ordered collection of equal-length labeled series.
///
/// Cloning is cheap: rows and alphabet are shared behind `Arc`s, so fitted
/// models keep a handle to their training data without copying it.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Arc<[LabeledSeries]>,
    alphabet: Arc<LabelAlphabet>,
    series_len: usize,
}

impl Dataset {
    /// Build a dataset, inferring the alphabet from the labels present.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::EmptyAlphabet`] | `rows` is empty |
    /// | [`NnError::InvalidSeries`] | A row is empty or holds a non-finite value |
    /// | [`NnError::SeriesLengthMismatch`] | Rows differ in length |
    pub fn new<S: AsRef<str>>(rows: Vec<(Vec<f64>, S)>) -> Result<Self, NnError> {
        let alphabet = LabelAlphabet::new(rows.iter().map(|(_, label)| label.as_ref()))?;
        Self::with_alphabet(alphabet, rows)
    }

    /// Build a dataset whose labels must all come from `alphabet`.
    ///
    /// Zero rows are accepted; the result is an empty dataset with series length 0.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::UnknownLabel`] | A row label is not in `alphabet` |
    /// | [`NnError::InvalidSeries`] | A row is empty or holds a non-finite value |
    /// | [`NnError::SeriesLengthMismatch`] | Rows differ in length |
    pub fn with_alphabet<S: AsRef<str>>(
        alphabet: LabelAlphabet,
        rows: Vec<(Vec<f64>, S)>,
    ) -> Result<Self, NnError> {
        let series_len = rows.first().map_or(0, |(values, _)| values.len());
        let mut labeled = Vec::with_capacity(rows.len());

        for (index, (values, name)) in rows.into_iter().enumerate() {
            let name = name.as_ref();
            let label = alphabet.label(name).ok_or_else(|| NnError::UnknownLabel {
                label: name.to_owned(),
            })?;
            if values.len() != series_len {
                return Err(NnError::SeriesLengthMismatch {
                    index,
                    expected: series_len,
                    got: values.len(),
                });
            }
            let series = TimeSeries::new(values).map_err(|source| NnError::InvalidSeries { index, source })?;
            labeled.push(LabeledSeries { series, label });
        }

        Ok(Self {
            rows: labeled.into(),
            alphabet: Arc::new(alphabet),
            series_len,
        })
    }

    /// Return the number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return true if the dataset holds no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the common series length, 0 for an empty dataset.
    #[must_use]
    pub fn series_len(&self) -> usize {
        self.series_len
    }

    /// Return the label alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &LabelAlphabet {
        &self.alphabet
    }

    /// Return the number of classes in the alphabet.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.alphabet.len()
    }

    /// Return all rows in order.
    #[must_use]
    pub fn rows(&self) -> &[LabeledSeries] {
        &self.rows
    }

    /// Return the row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LabeledSeries> {
        self.rows.get(index)
    }

    /// Return the labels of all rows in order.
    #[must_use]
    pub fn labels(&self) -> Vec<ClassLabel> {
        self.rows.iter().map(LabeledSeries::label).collect()
    }
}
